//! Typed precondition failures and user interruption
//!
//! Everything else the installer can hit (I/O failures mid-run, unreadable
//! templates) travels as a plain [`anyhow::Error`] with context attached. These
//! variants are the ones the CLI recognises so it can print a remediation hint.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// No toolkit directory could be found by auto-detection
    #[error("Cannot find toolkit files (agents/ and templates/ directories)")]
    ToolkitNotFound { searched: Vec<PathBuf> },

    /// An explicitly given toolkit directory lacks agents/ or templates/
    #[error("{0} is not a toolkit directory (agents/ and templates/ expected)")]
    InvalidToolkit(PathBuf),

    /// Project scaffolding needs the globally installed templates
    #[error("Templates not found at {0}")]
    TemplatesMissing(PathBuf),

    #[error("Cannot determine the home directory")]
    NoHomeDir,

    /// Ctrl+C between files; files already written are kept
    #[error("Interrupted")]
    Interrupted,
}

impl InstallError {
    /// What the user can do about it
    pub fn remediation(&self) -> String {
        match self {
            InstallError::ToolkitNotFound { .. } | InstallError::InvalidToolkit(_) => {
                "Run from inside the toolkit directory, or use: --from /path/to/toolkit"
                    .to_string()
            }
            InstallError::TemplatesMissing(_) => "Run `claude-init init-globals` first.".to_string(),
            InstallError::NoHomeDir => format!(
                "Set {} to the directory that should hold the global configuration.",
                crate::toolkit::CONFIG_DIR_ENV
            ),
            InstallError::Interrupted => {
                "Files written before the interruption were kept; run again to finish."
                    .to_string()
            }
        }
    }
}
