//! Save Coordinator and snapshot service commands.

use chrono::Utc;
use colored::Colorize;
use docmind_save::{FilesystemExportOps, SaveCoordinator, SnapshotService};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{OutputFormat, SaveCommands};
use crate::error::{CliError, CliResult};
use crate::output::print_output;

pub fn handle(cmd: SaveCommands, format: OutputFormat) -> CliResult<()> {
    match cmd {
        SaveCommands::MarkDirty { doc_id, content, path, delay_ms } => mark_dirty_cmd(doc_id, content, path, delay_ms, format),
        SaveCommands::Snapshot { doc_id, content, root } => snapshot_cmd(doc_id, content, root, format),
    }
}

fn mark_dirty_cmd(doc_id: String, content: String, path: String, delay_ms: u64, format: OutputFormat) -> CliResult<()> {
    let coordinator = SaveCoordinator::new(Arc::new(FilesystemExportOps)).with_autosave_delay(Duration::from_millis(delay_ms));

    let state = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(e.to_string()))?
        .block_on(async {
            coordinator.mark_dirty(doc_id.clone(), content, path).await;
            tokio::time::sleep(Duration::from_millis(delay_ms + 500)).await;
            coordinator.state_of(&doc_id).await
        });

    print_output(&state, format, |state| {
        println!("{}", "Save State".cyan().bold());
        println!("status: {:?}, dirty: {}", state.status, state.is_dirty);
        if let Some(error) = &state.last_error {
            println!("last error: {error}");
        }
    });
    Ok(())
}

fn snapshot_cmd(doc_id: String, content: String, root: String, format: OutputFormat) -> CliResult<()> {
    let service = SnapshotService::new(root);
    let entry = service
        .take_snapshot(&doc_id, &content, Utc::now())
        .map_err(|e| CliError::Other(e.to_string()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "doc_id": entry.doc_id,
                "path": entry.path.display().to_string(),
                "taken_at": entry.taken_at.to_rfc3339(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "snapshot written:".green(), entry.path.display());
        }
    }
    Ok(())
}
