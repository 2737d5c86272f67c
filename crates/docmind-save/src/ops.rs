//! Persistence operations (spec.md §6): `exportDocx`/`saveAsDocx`/
//! `importDocx`. Only the trait and a filesystem-backed snapshot
//! implementation are built here — the DOCX codec itself is excluded by
//! spec.md §1's Non-goals (file-format conversion).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ExportResult {
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAsResult {
    pub success: bool,
    pub file_path: Option<String>,
    pub error: Option<String>,
}

impl SaveAsResult {
    pub fn ok(file_path: impl Into<String>) -> Self {
        Self { success: true, file_path: Some(file_path.into()), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, file_path: None, error: Some(message.into()) }
    }
}

/// The host application's export surface: `exportDocx`, `saveAsDocx`,
/// `importDocx` (import is provided for completeness of the contract; the
/// Save Coordinator itself only ever calls the first two).
#[async_trait]
pub trait DocumentExportOps: Send + Sync {
    async fn export_docx(&self, path: &str, content: &str) -> ExportResult;

    async fn save_as_docx(&self, content: &str, filename_hint: Option<&str>) -> SaveAsResult;

    async fn import_docx(&self, path: &str) -> Result<String, String>;
}

/// A `std::fs`-backed implementation that writes the document's plain-text
/// projection instead of a real DOCX codec, standing in for the excluded
/// format-conversion layer so the coordinator can be exercised end to end.
pub struct FilesystemExportOps;

#[async_trait]
impl DocumentExportOps for FilesystemExportOps {
    async fn export_docx(&self, path: &str, content: &str) -> ExportResult {
        match std::fs::write(path, content) {
            Ok(()) => ExportResult::ok(),
            Err(err) => ExportResult::err(err.to_string()),
        }
    }

    async fn save_as_docx(&self, content: &str, filename_hint: Option<&str>) -> SaveAsResult {
        let path = filename_hint.unwrap_or("untitled.docx").to_string();
        match std::fs::write(&path, content) {
            Ok(()) => SaveAsResult::ok(path),
            Err(err) => SaveAsResult::err(err.to_string()),
        }
    }

    async fn import_docx(&self, path: &str) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|err| err.to_string())
    }
}
