//! Charm-style CLI prompts using cliclack

use crate::error::InstallError;
use crate::ui::{ConflictAction, Marker, StatusLine, Ui};
use anyhow::Result;
use colored::Colorize;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Terminal [`Ui`] rendered with cliclack
#[derive(Debug, Default, Clone)]
pub struct CliclackUi {
    interrupt: Arc<AtomicBool>,
}

impl CliclackUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an interruption whenever `flag` is set, e.g. by a Ctrl+C handler
    pub fn with_interrupt(flag: Arc<AtomicBool>) -> Self {
        Self { interrupt: flag }
    }
}

/// Esc / Ctrl+C inside a prompt surfaces as `Interrupted`; treat it as "no answer"
fn dismissed_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e),
    }
}

fn render(line: &StatusLine) -> String {
    let symbol = line.marker.symbol();
    let symbol = match line.marker {
        Marker::Done | Marker::New => symbol.green(),
        Marker::Skipped | Marker::Missing => symbol.yellow(),
        Marker::Exists => symbol.yellow().bold(),
        Marker::Unchanged => symbol.dimmed(),
    };

    match &line.note {
        Some(note) => {
            let wrapped = format!("({})", note);
            let note = match (line.marker, note.as_str()) {
                (Marker::Exists, _) => wrapped.as_str().yellow(),
                (Marker::Done, "backup saved") => wrapped.as_str().blue(),
                _ => wrapped.as_str().dimmed(),
            };
            format!("{} {}  {}", symbol, line.label, note)
        }
        None => format!("{} {}", symbol, line.label),
    }
}

impl Ui for CliclackUi {
    fn conflict_action(&mut self, conflicts: &[&str]) -> Result<Option<ConflictAction>> {
        let listing: Vec<String> = conflicts.iter().map(|c| format!("    {}", c)).collect();
        let heading = format!("{} file(s) already exist:", conflicts.len());
        cliclack::log::warning(format!(
            "{}\n{}",
            heading.as_str().yellow(),
            listing.join("\n")
        ))?;

        let mut select = cliclack::select("What would you like to do?");
        for action in ConflictAction::ALL {
            select = select.item(action, action.display_name(), "");
        }

        Ok(dismissed_as_none(select.interact())?)
    }

    fn confirm_overwrite(&mut self, label: &str) -> Result<bool> {
        let answer = dismissed_as_none(
            cliclack::confirm(format!(
                "{} already exists. Overwrite? (backup will be saved)",
                label
            ))
            .initial_value(false)
            .interact(),
        )?;
        Ok(answer.unwrap_or(false))
    }

    fn status(&mut self, line: &StatusLine) -> Result<()> {
        cliclack::log::remark(render(line))?;
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        cliclack::log::info(message)?;
        Ok(())
    }

    fn intro(&mut self, title: &str) -> Result<()> {
        cliclack::intro(title.bold())?;
        Ok(())
    }

    fn outro(&mut self, message: &str) -> Result<()> {
        cliclack::outro(message)?;
        Ok(())
    }

    fn cancelled(&mut self, message: &str) -> Result<()> {
        cliclack::outro_cancel(message.dimmed())?;
        Ok(())
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

/// Print a failure, with a remediation hint when the cause is a known precondition
pub fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<InstallError>() {
        Some(install_err) => {
            let _ = cliclack::log::error(format!("{} {}", "Error:".red(), install_err));
            let _ = cliclack::log::remark(install_err.remediation());
            if let InstallError::ToolkitNotFound { searched } = install_err {
                for dir in searched {
                    tracing::debug!(dir = %dir.display(), "searched");
                }
            }
        }
        None => {
            let _ = cliclack::log::error(format!("{} {:#}", "Error:".red(), err));
        }
    }
}
