//! Locating the toolkit source directory

use crate::error::InstallError;
use std::path::{Path, PathBuf};

/// Environment variable naming the toolkit directory
pub const TOOLKIT_ENV: &str = "CLAUDE_INIT_TOOLKIT";

/// File names accepted for the global instruction document, in order of preference
pub const GLOBAL_DOC_NAMES: &[&str] = &["CLAUDE.global-template.md", "CLAUDE.md"];

/// A toolkit directory holds both `agents/` and `templates/`
pub fn is_toolkit(dir: &Path) -> bool {
    dir.join("agents").is_dir() && dir.join("templates").is_dir()
}

/// Find the toolkit to install from.
///
/// An explicit directory must be a toolkit. Otherwise `$CLAUDE_INIT_TOOLKIT`,
/// the current directory and the directory of the running executable are
/// tried in that order.
pub fn locate_toolkit(explicit: Option<&Path>) -> Result<PathBuf, InstallError> {
    if let Some(dir) = explicit {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        return if is_toolkit(&dir) {
            Ok(dir)
        } else {
            Err(InstallError::InvalidToolkit(dir))
        };
    }

    search(default_search_dirs())
}

fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::var_os(TOOLKIT_ENV).filter(|d| !d.is_empty()) {
        dirs.push(PathBuf::from(dir));
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    dirs
}

fn search(candidates: Vec<PathBuf>) -> Result<PathBuf, InstallError> {
    for dir in &candidates {
        tracing::debug!(dir = %dir.display(), "looking for toolkit");
        if is_toolkit(dir) {
            return Ok(dir.clone());
        }
    }
    Err(InstallError::ToolkitNotFound {
        searched: candidates,
    })
}

/// The source for the global `CLAUDE.md`, whichever accepted name exists
pub fn find_global_doc(toolkit: &Path) -> Option<PathBuf> {
    GLOBAL_DOC_NAMES
        .iter()
        .map(|name| toolkit.join(name))
        .find(|path| path.exists())
}
