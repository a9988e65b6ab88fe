//! Installer Core - conflict-aware file installer behind `claude-init`
//!
//! This library copies a fixed set of toolkit files into either the global
//! configuration root (`~/.claude`) or a project directory, without ever
//! losing an existing file: anything that gets overwritten is backed up first.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Plans** - [`Candidate`]/[`FilePlan`] values, the [`resolve`]
//!   engine that decides install / update / skip, and the [`execute`] engine
//!   that performs the copies and backups
//! - **Layer 2: Workflows** - [`init_globals`] and [`init_project`], which build
//!   plan lists from the toolkit layout and drive resolution and execution
//! - **Layer 3: CLI/TUI Interface** - the [`Ui`] trait, with an optional
//!   cliclack-based implementation (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based [`tui::CliclackUi`]
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use installer_core::{execute, resolve, Candidate, FilePlan, ResolveOutcome};
//!
//! let mut plans = vec![FilePlan::new(Candidate::new("a.txt", "out/a.txt", "a"))];
//! if resolve(&mut plans, true, &mut my_ui)? == ResolveOutcome::Proceed {
//!     let counts = execute(&plans, Path::new("backups/20260101-000000"), &mut my_ui)?;
//! }
//! ```

pub mod commands;
pub mod error;
pub mod files;
pub mod plan;
pub mod toolkit;
pub mod ui;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use commands::{init_globals, init_project, GlobalsOptions, ProjectOptions, RunOutcome};
pub use error::InstallError;
pub use files::ContentHash;
pub use plan::{
    execute, resolve, Candidate, Counts, Disposition, FilePlan, Resolution, ResolveOutcome,
};
pub use toolkit::Layout;
pub use ui::{ConflictAction, Marker, StatusLine, Ui};

#[cfg(feature = "tui")]
pub use tui::CliclackUi;
