//! Observability utilities for the document-intelligence core.
//!
//! Every crate in this workspace that can fail or block (the Structure
//! Engine, the Envelope Builder, the Copilot Runtime, the Document Agent
//! Runner, the Save Coordinator) instruments its pass/turn/task boundaries
//! with `tracing`; this crate only owns the one-time subscriber setup plus
//! the two record types (`AuditEntry`, `MetricsRecorder`) that turn those
//! spans into something a host application can persist or export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with the default (`info`, unless `RUST_LOG` is set)
/// verbosity and full target/thread-id output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize tracing with compact, single-line output — used by the CLI
/// in non-verbose mode.
pub fn init_tracing_compact() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().compact().with_target(false))
        .init();
}

/// One row of a turn- or agent-run audit log: what happened, to which
/// document, whether it succeeded, and how long it took.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub document_id: String,
    pub session_id: Option<String>,
    pub details: serde_json::Value,
    pub success: bool,
    pub duration_ms: u64,
}

impl AuditEntry {
    pub fn new(operation: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            document_id: document_id.into(),
            session_id: None,
            details: serde_json::Value::Null,
            success: true,
            duration_ms: 0,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }
}

/// Running counters for copilot turns, document-agent tasks, and saves.
/// Not a metrics-export client — just enough state for the CLI's `stats`
/// output and for a host to sample into its own metrics backend.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    pub turns_total: u64,
    pub turns_failed: u64,
    pub agent_tasks_total: u64,
    pub agent_tasks_failed: u64,
    pub agent_tasks_skipped: u64,
    pub saves_total: u64,
    pub saves_failed: u64,
    pub snapshots_created: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_turn(&mut self, success: bool) {
        self.turns_total += 1;
        if !success {
            self.turns_failed += 1;
        }
    }

    pub fn record_agent_task(&mut self, outcome: AgentTaskOutcome) {
        self.agent_tasks_total += 1;
        match outcome {
            AgentTaskOutcome::Error => self.agent_tasks_failed += 1,
            AgentTaskOutcome::Skipped => self.agent_tasks_skipped += 1,
            AgentTaskOutcome::Success => {}
        }
    }

    pub fn record_save(&mut self, success: bool) {
        self.saves_total += 1;
        if !success {
            self.saves_failed += 1;
        }
    }

    pub fn record_snapshot(&mut self) {
        self.snapshots_created += 1;
    }
}

/// Coarse outcome of one document-agent task, for metrics purposes only
/// (the full per-task state lives in `docmind_agent::AgentTask`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTaskOutcome {
    Success,
    Error,
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_entry_builder_sets_fields() {
        let entry = AuditEntry::new("rewrite_section", "doc-1")
            .with_session("sess-1")
            .with_duration(42)
            .failed();

        assert_eq!(entry.operation, "rewrite_section");
        assert_eq!(entry.session_id.as_deref(), Some("sess-1"));
        assert!(!entry.success);
        assert_eq!(entry.duration_ms, 42);
    }

    #[test]
    fn metrics_recorder_tallies_by_outcome() {
        let mut metrics = MetricsRecorder::new();
        metrics.record_turn(true);
        metrics.record_turn(false);
        metrics.record_agent_task(AgentTaskOutcome::Success);
        metrics.record_agent_task(AgentTaskOutcome::Error);
        metrics.record_agent_task(AgentTaskOutcome::Skipped);

        assert_eq!(metrics.turns_total, 2);
        assert_eq!(metrics.turns_failed, 1);
        assert_eq!(metrics.agent_tasks_total, 3);
        assert_eq!(metrics.agent_tasks_failed, 1);
        assert_eq!(metrics.agent_tasks_skipped, 1);
    }
}
