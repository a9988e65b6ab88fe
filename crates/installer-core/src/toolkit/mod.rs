//! Toolkit layout: where files come from and where they go
//!
//! This module provides:
//! - The global configuration [`Layout`] (`~/.claude` by default)
//! - Toolkit source discovery
//! - Template rendering into scoped temporary files
//! - The `.gitignore` entry for personal settings

pub mod gitignore;
pub mod render;
pub mod source;

use crate::error::InstallError;
use chrono::{DateTime, TimeZone};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub use source::{find_global_doc, locate_toolkit};

/// Environment variable that relocates the global configuration root
pub const CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Name the tool installs itself under in `bin/`
pub const BINARY_NAME: &str = "claude-init";

/// Agent definitions copied from `agents/<name>.md`
pub const AGENTS: &[&str] = &["architect", "developer", "tester", "documentator"];

/// Templates copied from `templates/`
pub const TEMPLATES: &[&str] = &[
    PROJECT_TEMPLATE,
    "CONVENTIONS.md",
    "session-notes.md",
    "settings.json",
    "settings.local.json",
    MCP_TEMPLATE,
];

pub const PROJECT_TEMPLATE: &str = "CLAUDE.project-template.md";
pub const MCP_TEMPLATE: &str = ".mcp.json.template";

/// Directory layout of the global configuration root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    display_root: String,
}

impl Layout {
    /// A layout rooted at `root`, shown to the user by its full path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let display_root = root.display().to_string();
        Self { root, display_root }
    }

    /// `$CLAUDE_CONFIG_DIR` when set, otherwise `~/.claude`
    pub fn from_env() -> Result<Self, InstallError> {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::new(PathBuf::from(dir))),
            _ => {
                let home = dirs::home_dir().ok_or(InstallError::NoHomeDir)?;
                Ok(Self {
                    root: home.join(".claude"),
                    display_root: "~/.claude".to_string(),
                })
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.root.join("agents")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    /// User-facing label for a path below the root, e.g. `~/.claude/agents/tester.md`
    pub fn label(&self, relative: &str) -> String {
        format!("{}/{}", self.display_root, relative)
    }

    /// Shell snippet that puts `bin/` on PATH
    pub fn path_export(&self) -> String {
        let bin = match self.display_root.strip_prefix('~') {
            Some(rest) => format!("$HOME{}/bin", rest),
            None => format!("{}/bin", self.display_root),
        };
        format!("export PATH=\"{}:$PATH\"", bin)
    }
}

/// A fresh per-run backup directory below `base`, named by timestamp.
///
/// If a directory for the same second already exists a `-N` suffix is added,
/// so two runs never share a backup root.
pub fn backup_root<Tz: TimeZone>(base: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y%m%d-%H%M%S").to_string();
    let mut candidate = base.join(&stamp);
    let mut n = 1;
    while candidate.exists() {
        candidate = base.join(format!("{}-{}", stamp, n));
        n += 1;
    }
    candidate
}

/// Whether `dir` is one of the entries of a PATH-style variable
pub fn dir_in_path(dir: &Path, path_var: Option<&OsStr>) -> bool {
    path_var
        .map(|paths| std::env::split_paths(paths).any(|entry| entry == dir))
        .unwrap_or(false)
}
