//! Conflict resolution: decide install / update / skip for every plan

use super::{FilePlan, Resolution};
use crate::files::ContentHash;
use crate::ui::{ConflictAction, Ui};
use anyhow::Result;

/// Whether the run should go on after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Every open plan has a resolution
    Proceed,
    /// The user quit; no plan was touched
    Aborted,
}

/// Assign a resolution to every pending plan, asking the user only when needed.
///
/// - No conflicts: everything installs, nothing is asked.
/// - `force`: conflicts update, the rest install, nothing is asked.
/// - Otherwise one aggregate question is asked, and with
///   [`ConflictAction::PerFile`] one confirmation per conflicting plan.
///
/// Plans that already carry a resolution and always-apply plans are left as
/// they are, so calling this on a partially decided list is safe.
pub fn resolve<U: Ui + ?Sized>(
    plans: &mut [FilePlan],
    force: bool,
    ui: &mut U,
) -> Result<ResolveOutcome> {
    let conflict_count = plans
        .iter()
        .filter(|p| is_open(p) && p.candidate().has_conflict())
        .count();

    if conflict_count == 0 {
        settle_all(plans, false)?;
        return Ok(ResolveOutcome::Proceed);
    }

    if force {
        tracing::debug!(conflicts = conflict_count, "force: overwriting existing files");
        settle_all(plans, true)?;
        return Ok(ResolveOutcome::Proceed);
    }

    let labels: Vec<&str> = plans
        .iter()
        .filter(|p| is_open(p) && p.candidate().has_conflict())
        .map(|p| p.candidate().label())
        .collect();
    let action = ui
        .conflict_action(&labels)?
        .unwrap_or(ConflictAction::Quit);
    tracing::debug!(?action, "conflict action chosen");

    match action {
        ConflictAction::Quit => return Ok(ResolveOutcome::Aborted),
        ConflictAction::OverwriteAll => settle_all(plans, true)?,
        ConflictAction::SkipAll => settle_all(plans, false)?,
        ConflictAction::PerFile => {
            for plan in plans.iter_mut().filter(|p| is_open(p)) {
                let overwrite = plan.candidate().has_conflict()
                    && ui.confirm_overwrite(plan.candidate().label())?;
                settle(plan, overwrite)?;
            }
        }
    }

    Ok(ResolveOutcome::Proceed)
}

fn is_open(plan: &FilePlan) -> bool {
    plan.is_pending() && !plan.candidate().is_always_apply()
}

fn settle_all(plans: &mut [FilePlan], overwrite: bool) -> Result<()> {
    for plan in plans.iter_mut().filter(|p| is_open(p)) {
        settle(plan, overwrite)?;
    }
    Ok(())
}

/// Non-conflicting plans always install; conflicting ones update or skip
fn settle(plan: &mut FilePlan, overwrite: bool) -> Result<()> {
    let candidate = plan.candidate();
    let resolution = if !candidate.has_conflict() {
        Resolution::Install
    } else if overwrite {
        Resolution::UpdateWithBackup {
            existing: ContentHash::of_file(candidate.destination())?,
        }
    } else {
        Resolution::Skip
    };

    tracing::trace!(label = candidate.label(), ?resolution, "resolved");
    plan.resolve_as(resolution);
    Ok(())
}
