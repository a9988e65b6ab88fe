//! The two user-facing workflows: global install and project scaffolding
//!
//! Both follow the same shape: build plans, show what already exists, resolve
//! conflicts, execute, summarise.

pub mod globals;
pub mod project;

use crate::plan::{Candidate, Counts, FilePlan};
use crate::ui::{Marker, StatusLine, Ui};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use globals::{init_globals, GlobalsOptions};
pub use project::{init_project, ProjectOptions};

/// How a workflow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(Counts),
    /// The user quit at the conflict prompt; nothing was written
    Aborted,
}

/// Plan a copy of `source` if it exists; otherwise report it missing and move on
fn plan_if_present<U: Ui + ?Sized>(
    plans: &mut Vec<FilePlan>,
    ui: &mut U,
    source: PathBuf,
    destination: PathBuf,
    label: String,
    missing_name: &str,
) -> Result<()> {
    if source.exists() {
        plans.push(Candidate::new(source, destination, label).into());
    } else {
        report_missing(ui, missing_name)?;
    }
    Ok(())
}

fn report_missing<U: Ui + ?Sized>(ui: &mut U, name: &str) -> Result<()> {
    tracing::info!(%name, "input not found, skipping");
    ui.status(&StatusLine::new(Marker::Missing, name).with_note("not found, skipping"))
}

/// Show, before anything is decided, which destinations are new and which exist
fn report_prescan<U: Ui + ?Sized>(plans: &[FilePlan], ui: &mut U) -> Result<()> {
    ui.note("Checking files...")?;
    for plan in plans {
        let candidate = plan.candidate();
        let line = if candidate.is_always_apply() {
            StatusLine::new(Marker::Unchanged, candidate.label()).with_note("always updated")
        } else if candidate.has_conflict() {
            StatusLine::new(Marker::Exists, candidate.label()).with_note("exists")
        } else {
            StatusLine::new(Marker::New, candidate.label()).with_note("new")
        };
        ui.status(&line)?;
    }
    Ok(())
}

fn report_force<U: Ui + ?Sized>(plans: &[FilePlan], ui: &mut U) -> Result<()> {
    let conflicts = plans
        .iter()
        .filter(|p| p.candidate().has_conflict())
        .count();
    if conflicts > 0 {
        ui.note(&format!(
            "--force: overwriting {} existing file(s)",
            conflicts
        ))?;
    }
    Ok(())
}

pub fn summary_line(counts: &Counts) -> String {
    format!(
        "Done.  {} installed · {} updated · {} skipped",
        counts.installed, counts.updated, counts.skipped
    )
}

fn backup_root_for(base: &Path) -> PathBuf {
    crate::toolkit::backup_root(base, &chrono::Local::now())
}
