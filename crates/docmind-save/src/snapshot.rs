//! Point-in-time snapshots (spec.md §6): a filesystem-backed history of a
//! document independent of the live autosave path, with retention pruning.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_RETENTION: usize = 5;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to create snapshot directory for document {doc_id}: {source}")]
    CreateDir { doc_id: String, #[source] source: std::io::Error },
    #[error("failed to write snapshot {path}: {source}")]
    Write { path: String, #[source] source: std::io::Error },
    #[error("failed to list snapshots for document {doc_id}: {source}")]
    List { doc_id: String, #[source] source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub doc_id: String,
    pub path: PathBuf,
    pub taken_at: DateTime<Utc>,
}

/// Writes and prunes document snapshots under `<root>/<docId>/YYYYMMDD-HHmmss.docx`,
/// matching the host application's `<userData>/ai-libre/snapshots/` layout.
pub struct SnapshotService {
    root: PathBuf,
    retention: usize,
}

impl SnapshotService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), retention: DEFAULT_RETENTION }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    fn doc_dir(&self, doc_id: &str) -> PathBuf {
        self.root.join(doc_id)
    }

    /// Writes a new snapshot at `taken_at` and prunes the oldest entries
    /// beyond the retention limit. `taken_at` is caller-supplied since this
    /// crate never reads the wall clock directly.
    pub fn take_snapshot(&self, doc_id: &str, content: &str, taken_at: DateTime<Utc>) -> Result<SnapshotEntry, SnapshotError> {
        let dir = self.doc_dir(doc_id);
        std::fs::create_dir_all(&dir).map_err(|source| SnapshotError::CreateDir { doc_id: doc_id.to_string(), source })?;

        let filename = format!("{}.docx", taken_at.format("%Y%m%d-%H%M%S"));
        let path = dir.join(&filename);
        std::fs::write(&path, content).map_err(|source| SnapshotError::Write { path: path.display().to_string(), source })?;

        debug!(doc_id, path = %path.display(), "save.snapshot: wrote snapshot");
        self.prune(doc_id)?;

        Ok(SnapshotEntry { doc_id: doc_id.to_string(), path, taken_at })
    }

    /// Lists existing snapshots for a document, oldest first, by filename
    /// (the `YYYYMMDD-HHmmss` stem sorts lexicographically with time).
    pub fn list_snapshots(&self, doc_id: &str) -> Result<Vec<PathBuf>, SnapshotError> {
        let dir = self.doc_dir(doc_id);
        if !dir.exists() {
            return Ok(vec![]);
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)
            .map_err(|source| SnapshotError::List { doc_id: doc_id.to_string(), source })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "docx"))
            .collect();
        entries.sort();
        Ok(entries)
    }

    fn prune(&self, doc_id: &str) -> Result<(), SnapshotError> {
        let entries = self.list_snapshots(doc_id)?;
        if entries.len() <= self.retention {
            return Ok(());
        }
        let overflow = entries.len() - self.retention;
        for stale in &entries[..overflow] {
            if let Err(err) = std::fs::remove_file(stale) {
                debug!(path = %stale.display(), %err, "save.snapshot: prune skipped an already-missing file");
            }
        }
        Ok(())
    }
}

/// Builds the default snapshot root for a given user-data directory, per
/// the host layout `<userData>/ai-libre/snapshots/`.
pub fn default_snapshot_root(user_data_dir: impl AsRef<Path>) -> PathBuf {
    user_data_dir.as_ref().join("ai-libre").join("snapshots")
}
