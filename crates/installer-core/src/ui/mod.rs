//! User interaction seam for the installer
//!
//! The resolution and execution engines never talk to the terminal directly.
//! They ask for choices and report progress through the [`Ui`] trait, so a
//! real terminal implementation (see `tui`) and a scripted one for tests can
//! be swapped freely.

#[cfg(test)]
pub(crate) mod scripted;

use anyhow::Result;
use std::fmt;

/// Aggregate answer to "some files already exist, what now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictAction {
    /// Overwrite every existing file, backing each one up first
    OverwriteAll,
    /// Leave every existing file alone
    SkipAll,
    /// Ask once per existing file
    PerFile,
    /// Stop without touching anything
    Quit,
}

impl ConflictAction {
    pub const ALL: [ConflictAction; 4] = [
        ConflictAction::OverwriteAll,
        ConflictAction::SkipAll,
        ConflictAction::PerFile,
        ConflictAction::Quit,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ConflictAction::OverwriteAll => "Overwrite all  (originals backed up)",
            ConflictAction::SkipAll => "Skip all existing",
            ConflictAction::PerFile => "Decide per file",
            ConflictAction::Quit => "Quit",
        }
    }
}

impl fmt::Display for ConflictAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Leading symbol of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Written to disk
    Done,
    /// Deliberately left alone
    Skipped,
    /// Already present, will need a decision
    Exists,
    /// Will be created
    New,
    /// Nothing to do
    Unchanged,
    /// Expected input not found
    Missing,
}

impl Marker {
    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Done => "✓",
            Marker::Skipped | Marker::Missing => "⊘",
            Marker::Exists => "⚠",
            Marker::New => "·",
            Marker::Unchanged => "—",
        }
    }
}

/// A single line of progress output: marker, label, optional note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub marker: Marker,
    pub label: String,
    pub note: Option<String>,
}

impl StatusLine {
    pub fn new(marker: Marker, label: impl Into<String>) -> Self {
        Self {
            marker,
            label: label.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker.symbol(), self.label)?;
        if let Some(note) = &self.note {
            write!(f, "  ({})", note)?;
        }
        Ok(())
    }
}

/// Interactive capabilities the installer needs from its host
pub trait Ui {
    /// Ask what to do about `conflicts` (labels of existing files).
    ///
    /// `Ok(None)` means the prompt was dismissed without an answer, which
    /// callers treat the same as [`ConflictAction::Quit`].
    fn conflict_action(&mut self, conflicts: &[&str]) -> Result<Option<ConflictAction>>;

    /// Ask whether one existing file may be overwritten (a backup is kept).
    /// A dismissed prompt answers `false`.
    fn confirm_overwrite(&mut self, label: &str) -> Result<bool>;

    /// Print one status line
    fn status(&mut self, line: &StatusLine) -> Result<()>;

    /// Print an informational message
    fn note(&mut self, message: &str) -> Result<()>;

    /// Open a run with a title banner
    fn intro(&mut self, title: &str) -> Result<()> {
        self.note(title)
    }

    /// Close a run that completed
    fn outro(&mut self, message: &str) -> Result<()> {
        self.note(message)
    }

    /// Close a run the user cancelled
    fn cancelled(&mut self, message: &str) -> Result<()> {
        self.note(message)
    }

    /// Whether the user asked to stop (Ctrl+C outside a prompt).
    /// Checked between files, so a run stops without leaving one half written.
    fn interrupted(&self) -> bool {
        false
    }
}
