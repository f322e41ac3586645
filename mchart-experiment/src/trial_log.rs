use mchart_core::TrialEntry;
use serde::{Deserialize, Serialize};

/// Column shape of the entries a log holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLayout {
    /// One orientation per entry (alternating sessions).
    Single,
    /// Vertical and horizontal readings per entry (cross sessions).
    Paired,
}

/// Chronological, append-only record of confirmed trials.
///
/// Only the state machine appends; everyone else reads through
/// [`TrialLog::entries`] or takes a [`TrialLog::snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrialLog {
    layout: LogLayout,
    entries: Vec<TrialEntry>,
}

impl TrialLog {
    pub(crate) fn new(layout: LogLayout) -> Self {
        Self {
            layout,
            entries: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, entry: TrialEntry) -> &TrialEntry {
        debug_assert_eq!(entry.measurements.is_paired(), self.layout == LogLayout::Paired);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn layout(&self) -> LogLayout {
        self.layout
    }

    pub fn entries(&self) -> &[TrialEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<TrialEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TrialEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a TrialLog {
    type Item = &'a TrialEntry;
    type IntoIter = std::slice::Iter<'a, TrialEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
