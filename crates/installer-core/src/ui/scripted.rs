//! Deterministic [`Ui`] for tests: answers come from a script, output is recorded

use super::{ConflictAction, StatusLine, Ui};
use anyhow::Result;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub(crate) struct ScriptedUi {
    /// Answer for the aggregate prompt; `None` simulates a dismissed prompt
    pub action: Option<ConflictAction>,
    /// Answers for per-file confirmations, consumed in order (missing = decline)
    pub confirms: VecDeque<bool>,
    /// Conflict lists the aggregate prompt was shown
    pub asked: Vec<Vec<String>>,
    /// Labels per-file confirmation was requested for
    pub confirmed: Vec<String>,
    pub lines: Vec<StatusLine>,
    pub notes: Vec<String>,
    /// Report an interruption once this many status lines were printed
    pub interrupt_after: Option<usize>,
}

impl ScriptedUi {
    pub fn answering(action: ConflictAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    pub fn with_confirms(mut self, answers: &[bool]) -> Self {
        self.confirms = answers.iter().copied().collect();
        self
    }

    pub fn interrupted_after(mut self, lines: usize) -> Self {
        self.interrupt_after = Some(lines);
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.asked.len() + self.confirmed.len()
    }
}

impl Ui for ScriptedUi {
    fn conflict_action(&mut self, conflicts: &[&str]) -> Result<Option<ConflictAction>> {
        self.asked
            .push(conflicts.iter().map(|c| c.to_string()).collect());
        Ok(self.action)
    }

    fn confirm_overwrite(&mut self, label: &str) -> Result<bool> {
        self.confirmed.push(label.to_string());
        Ok(self.confirms.pop_front().unwrap_or(false))
    }

    fn status(&mut self, line: &StatusLine) -> Result<()> {
        self.lines.push(line.clone());
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        self.notes.push(message.to_string());
        Ok(())
    }

    fn interrupted(&self) -> bool {
        self.interrupt_after
            .is_some_and(|after| self.lines.len() >= after)
    }
}
