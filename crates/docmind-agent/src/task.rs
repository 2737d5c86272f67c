//! Per-task and overall state for a Document Agent run (spec.md §3, §4.6).

use docmind_core::SectionId;
use serde::{Deserialize, Serialize};

/// Status of one section's transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentTaskStatus {
    Pending,
    Running,
    Success,
    Error,
    Skipped,
}

/// One task per section, created at agent-run initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTask {
    pub section_id: SectionId,
    pub title: String,
    pub status: AgentTaskStatus,
    pub error: Option<String>,
    pub output: Option<String>,
}

impl AgentTask {
    pub fn pending(section_id: SectionId, title: impl Into<String>) -> Self {
        Self {
            section_id,
            title: title.into(),
            status: AgentTaskStatus::Pending,
            error: None,
            output: None,
        }
    }
}

/// Overall status of a Document Agent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentOverallStatus {
    Idle,
    Running,
    Success,
    Error,
    Canceled,
}

/// The full state of one agent run, snapshotted for the observer callback
/// after every task transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub tasks: Vec<AgentTask>,
    pub status: AgentOverallStatus,
    pub current_index: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
}

impl AgentState {
    pub fn new(tasks: Vec<AgentTask>) -> Self {
        Self {
            tasks,
            status: AgentOverallStatus::Idle,
            current_index: 0,
            success_count: 0,
            error_count: 0,
            skipped_count: 0,
        }
    }

    pub fn recompute_counters(&mut self) {
        self.success_count = self.tasks.iter().filter(|t| t.status == AgentTaskStatus::Success).count();
        self.error_count = self.tasks.iter().filter(|t| t.status == AgentTaskStatus::Error).count();
        self.skipped_count = self.tasks.iter().filter(|t| t.status == AgentTaskStatus::Skipped).count();
    }

    pub fn is_finished(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| !matches!(t.status, AgentTaskStatus::Pending | AgentTaskStatus::Running))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::BlockId;

    #[test]
    fn recompute_counters_tallies_by_status() {
        let mut state = AgentState::new(vec![
            AgentTask { status: AgentTaskStatus::Success, ..AgentTask::pending(SectionId::from_title_block(&BlockId::new("a")), "a") },
            AgentTask { status: AgentTaskStatus::Error, ..AgentTask::pending(SectionId::from_title_block(&BlockId::new("b")), "b") },
            AgentTask { status: AgentTaskStatus::Skipped, ..AgentTask::pending(SectionId::from_title_block(&BlockId::new("c")), "c") },
        ]);
        state.recompute_counters();
        assert_eq!(state.success_count, 1);
        assert_eq!(state.error_count, 1);
        assert_eq!(state.skipped_count, 1);
    }
}
