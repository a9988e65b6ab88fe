//! Append-only `.gitignore` entry for personal settings

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Personal settings that should never be committed
pub const SETTINGS_ENTRY: &str = ".claude/settings.local.json";

const ENTRY_COMMENT: &str = "# Claude Code — personal settings";

/// Whether `entry` already appears anywhere in the file (plain substring match).
/// A missing file has no entries.
pub fn has_entry(path: &Path, entry: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).contains(entry)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Append `entry` (under a comment line) unless it is already present.
///
/// A separating newline is written first only when the file has content.
/// Returns whether the file was changed.
pub fn ensure_entry(path: &Path, entry: &str) -> Result<bool> {
    if has_entry(path, entry)? {
        return Ok(false);
    }

    let non_empty = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut block = String::new();
    if non_empty {
        block.push('\n');
    }
    block.push_str(ENTRY_COMMENT);
    block.push('\n');
    block.push_str(entry);
    block.push('\n');

    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
