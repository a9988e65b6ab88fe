//! Carry out resolved plans on disk

use super::{FilePlan, Resolution};
use crate::error::InstallError;
use crate::files::{self, ContentHash};
use crate::ui::{Marker, StatusLine, Ui};
use anyhow::{Context, Result};
use std::path::Path;

/// Totals of one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub installed: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl Counts {
    pub fn new(installed: usize, updated: usize, skipped: usize) -> Self {
        Self {
            installed,
            updated,
            skipped,
        }
    }

    pub fn total(&self) -> usize {
        self.installed + self.updated + self.skipped
    }
}

/// Perform every plan in order and return what was done.
///
/// Updates back the existing destination up into `backup_root` before it is
/// overwritten. Always-apply plans are copied unconditionally, made
/// executable and counted as updated.
///
/// The first failure is returned immediately; plans already carried out stay
/// applied. An interruption reported by `ui` stops the run the same way, with
/// [`InstallError::Interrupted`].
pub fn execute<U: Ui + ?Sized>(
    plans: &[FilePlan],
    backup_root: &Path,
    ui: &mut U,
) -> Result<Counts> {
    let mut counts = Counts::default();

    for plan in plans {
        let candidate = plan.candidate();
        let label = candidate.label();
        let src = candidate.source();
        let dest = candidate.destination();

        if ui.interrupted() {
            tracing::warn!(%label, "interrupted before this file");
            return Err(InstallError::Interrupted.into());
        }

        if candidate.is_always_apply() {
            if files::same_file(src, dest) {
                tracing::debug!(%label, dest = %dest.display(), "source is the destination");
            } else {
                files::ensure_parent_dir(dest)?;
                files::replace_with_copy(src, dest)?;
                tracing::debug!(%label, dest = %dest.display(), "always-apply copy");
            }
            files::make_executable(dest)?;
            ui.status(&StatusLine::new(Marker::Done, label).with_note("updated"))?;
            counts.updated += 1;
            continue;
        }

        let resolution = plan
            .resolution()
            .with_context(|| format!("{} was never resolved", label))?;

        match resolution {
            Resolution::Skip => {
                tracing::debug!(%label, "skipped");
                ui.status(&StatusLine::new(Marker::Skipped, label).with_note("skipped"))?;
                counts.skipped += 1;
            }
            // The destination was absent at planning time but has appeared since
            Resolution::Install if dest.exists() => {
                tracing::warn!(%label, "destination appeared after planning; backing it up");
                overwrite_with_backup(src, dest, backup_root, None)?;
                ui.status(&StatusLine::new(Marker::Done, label).with_note("backup saved"))?;
                counts.updated += 1;
            }
            Resolution::Install => {
                install(src, dest)?;
                ui.status(&StatusLine::new(Marker::Done, label))?;
                counts.installed += 1;
            }
            // The destination was removed after planning; nothing left to back up
            Resolution::UpdateWithBackup { .. } if !dest.exists() => {
                tracing::warn!(%label, "destination vanished after planning; installing");
                install(src, dest)?;
                ui.status(&StatusLine::new(Marker::Done, label))?;
                counts.installed += 1;
            }
            Resolution::UpdateWithBackup { existing } => {
                overwrite_with_backup(src, dest, backup_root, Some(existing))?;
                ui.status(&StatusLine::new(Marker::Done, label).with_note("backup saved"))?;
                counts.updated += 1;
            }
        }
    }

    Ok(counts)
}

fn install(src: &Path, dest: &Path) -> Result<()> {
    files::ensure_parent_dir(dest)?;
    files::copy_with_metadata(src, dest)?;
    tracing::debug!(dest = %dest.display(), "installed");
    Ok(())
}

/// Back `dest` up into `backup_root`, then copy `src` over it
fn overwrite_with_backup(
    src: &Path,
    dest: &Path,
    backup_root: &Path,
    expected: Option<&ContentHash>,
) -> Result<()> {
    let backup = files::backup_file(dest, backup_root)?;

    if let Some(expected) = expected {
        let actual = ContentHash::of_file(&backup)?;
        if &actual != expected {
            tracing::warn!(
                dest = %dest.display(),
                %expected,
                %actual,
                "destination changed between planning and backup"
            );
        }
    }

    files::copy_with_metadata(src, dest)?;
    tracing::debug!(dest = %dest.display(), backup = %backup.display(), "updated");
    Ok(())
}
