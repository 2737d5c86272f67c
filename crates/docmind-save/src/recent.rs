//! Recovery bookkeeping (spec.md §6): remembers which documents were still
//! dirty when the application last closed them, so the host can offer to
//! recover unsaved work on next launch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentDocumentEntry {
    pub doc_id: String,
    pub file_path: Option<String>,
    pub was_dirty_at_close: bool,
    pub last_snapshot_path: Option<String>,
}

/// An in-memory (serializable) record of recently-open documents. The host
/// application is responsible for persisting and loading this between runs;
/// this type only tracks the bookkeeping rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentDocumentsStore {
    entries: HashMap<String, RecentDocumentEntry>,
}

impl RecentDocumentsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_open(&mut self, doc_id: impl Into<String>, file_path: Option<String>) {
        let doc_id = doc_id.into();
        self.entries.insert(
            doc_id.clone(),
            RecentDocumentEntry { doc_id, file_path, was_dirty_at_close: false, last_snapshot_path: None },
        );
    }

    pub fn record_snapshot(&mut self, doc_id: &str, snapshot_path: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(doc_id) {
            entry.last_snapshot_path = Some(snapshot_path.into());
        }
    }

    /// Called when a document is closed, with whatever `is_dirty` its
    /// `SaveState` held at that moment.
    pub fn record_close(&mut self, doc_id: &str, was_dirty: bool) {
        if let Some(entry) = self.entries.get_mut(doc_id) {
            entry.was_dirty_at_close = was_dirty;
        }
    }

    /// Documents that should be offered for recovery on next launch.
    pub fn needing_recovery(&self) -> Vec<&RecentDocumentEntry> {
        self.entries.values().filter(|e| e.was_dirty_at_close).collect()
    }

    pub fn get(&self, doc_id: &str) -> Option<&RecentDocumentEntry> {
        self.entries.get(doc_id)
    }
}
