//! Per-document save state (spec.md §3 `SaveState`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Pending,
    Saving,
    Saved,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    pub status: SaveStatus,
    pub is_dirty: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub file_path: Option<String>,
    /// Internal retry counter; not part of the spec's public `SaveState`
    /// shape, but needed to cap the Save Coordinator's retry loop.
    #[serde(skip)]
    pub(crate) retry_count: u32,
    /// Bumped on every `mark_dirty`; a debounce timer only fires a save if
    /// the generation it captured is still current, so a superseded timer
    /// becomes a no-op instead of saving stale content.
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl Default for SaveState {
    fn default() -> Self {
        Self {
            status: SaveStatus::Idle,
            is_dirty: false,
            last_saved: None,
            last_error: None,
            file_path: None,
            retry_count: 0,
            generation: 0,
        }
    }
}

impl SaveState {
    pub fn new() -> Self {
        Self::default()
    }
}
