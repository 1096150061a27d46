//! In-memory list of conversation summaries used for switching.

use skillflow_common::ConversationId;
use skillflow_store::ConversationSummary;

#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    entries: Vec<ConversationSummary>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry with the same id in place, or prepend a new one.
    pub fn upsert(&mut self, summary: ConversationSummary) {
        match self.entries.iter_mut().find(|e| e.id == summary.id) {
            Some(existing) => *existing = summary,
            None => self.entries.insert(0, summary),
        }
    }

    /// Remove an entry. Returns whether it was present.
    pub fn remove(&mut self, id: &ConversationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.entries.len() != before
    }

    /// Replace every entry, e.g. after a fresh fetch from the store.
    pub fn replace_all(&mut self, entries: Vec<ConversationSummary>) {
        self.entries = entries;
    }

    pub fn get(&self, id: &ConversationId) -> Option<&ConversationSummary> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn entries(&self) -> &[ConversationSummary] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
