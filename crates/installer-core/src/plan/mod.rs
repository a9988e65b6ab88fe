//! File plans: what to copy where, and what was decided about it
//!
//! A run builds a list of [`FilePlan`]s, hands it to [`resolve`] to decide each
//! plan's fate, and then to [`execute`] to carry those decisions out.
//!
//! Conflicts are detected once, when the [`Candidate`] is built. The executor
//! re-checks the destination before acting, so a file that appears or vanishes
//! in between is still handled without losing data.

pub mod executor;
pub mod resolver;

use crate::files::ContentHash;
use std::fmt;
use std::path::{Path, PathBuf};

pub use executor::{execute, Counts};
pub use resolver::{resolve, ResolveOutcome};

/// One proposed file copy, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    source: PathBuf,
    destination: PathBuf,
    label: String,
    always_apply: bool,
    has_conflict: bool,
}

impl Candidate {
    /// A regular candidate; it conflicts if `destination` exists right now
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self::build(source.into(), destination.into(), label.into(), false)
    }

    /// A candidate that is copied on every run without asking (the tool's own binary)
    pub fn always_apply(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self::build(source.into(), destination.into(), label.into(), true)
    }

    fn build(source: PathBuf, destination: PathBuf, label: String, always_apply: bool) -> Self {
        let has_conflict = !always_apply && destination.exists();
        Self {
            source,
            destination,
            label,
            always_apply,
            has_conflict,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_always_apply(&self) -> bool {
        self.always_apply
    }

    /// Whether the destination existed when this candidate was built
    pub fn has_conflict(&self) -> bool {
        self.has_conflict
    }
}

/// What the resolver decided for a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Destination is new; copy the source in
    Install,
    /// Destination exists; back it up, then overwrite it
    UpdateWithBackup {
        /// Hash of the destination content seen at resolution time
        existing: ContentHash,
    },
    /// Destination exists and is left alone
    Skip,
}

/// Reporting view of a plan's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    Pending,
    Install,
    Update,
    Skip,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Disposition::Pending => "pending",
            Disposition::Install => "install",
            Disposition::Update => "update",
            Disposition::Skip => "skip",
        };
        write!(f, "{}", s)
    }
}

/// A candidate together with its (possibly still pending) resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    candidate: Candidate,
    resolution: Option<Resolution>,
}

impl FilePlan {
    pub fn new(candidate: Candidate) -> Self {
        Self {
            candidate,
            resolution: None,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.resolution.is_none()
    }

    /// Record a decision. A plan that is already decided keeps its first decision;
    /// returns whether `resolution` was applied.
    pub fn resolve_as(&mut self, resolution: Resolution) -> bool {
        if self.resolution.is_some() {
            return false;
        }
        self.resolution = Some(resolution);
        true
    }

    pub fn disposition(&self) -> Disposition {
        match &self.resolution {
            None => Disposition::Pending,
            Some(Resolution::Install) => Disposition::Install,
            Some(Resolution::UpdateWithBackup { .. }) => Disposition::Update,
            Some(Resolution::Skip) => Disposition::Skip,
        }
    }
}

impl From<Candidate> for FilePlan {
    fn from(candidate: Candidate) -> Self {
        Self::new(candidate)
    }
}
