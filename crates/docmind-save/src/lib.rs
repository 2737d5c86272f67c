//! Save & Snapshot Coordinator: debounced autosave, manual save, point-in-time
//! snapshots, and recovery bookkeeping (spec.md §6-7, ambient per SPEC_FULL.md).

mod coordinator;
mod ops;
mod recent;
mod snapshot;
mod state;

pub use coordinator::{SaveCoordinator, DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};
pub use ops::{DocumentExportOps, ExportResult, FilesystemExportOps, SaveAsResult};
pub use recent::{RecentDocumentEntry, RecentDocumentsStore};
pub use snapshot::{default_snapshot_root, SnapshotEntry, SnapshotError, SnapshotService, DEFAULT_RETENTION};
pub use state::{SaveState, SaveStatus};
