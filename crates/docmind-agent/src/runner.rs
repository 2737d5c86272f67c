//! The Document Agent Runner (spec.md §4.6): a serial, cancellable loop
//! that applies one transformation (summarize or translate) to every
//! section of a document, in document order.

use crate::llm::{LlmMessage, LlmTransport};
use crate::task::{AgentOverallStatus, AgentState, AgentTask, AgentTaskStatus};
use docmind_context::{EditorMutationFacade, EditorReadFacade};
use docmind_core::{DocStructureSnapshot, SectionId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sections shorter than this (character count) are skipped rather than
/// sent to the LLM.
pub const DEFAULT_MIN_SECTION_CHARS: usize = 50;

const SYSTEM_PROMPT: &str =
    "You transform one section of a document at a time. Return only the transformed text, no commentary.";

/// Which per-section transformation a run applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Summarize,
    Translate,
}

/// One section's identity, title, and full text, captured once at run
/// initialization so the run is insulated from concurrent edits.
#[derive(Debug, Clone)]
pub struct SectionSeed {
    pub id: SectionId,
    pub title: String,
    pub text: String,
}

/// Snapshot the section list via the editor façade, matching spec.md's
/// "snapshot the section list via the document-ops façade" initialization
/// step.
pub fn collect_section_seeds(
    snapshot: &DocStructureSnapshot,
    facade: &dyn EditorReadFacade,
) -> Vec<SectionSeed> {
    snapshot
        .flatten_sections()
        .into_iter()
        .map(|section| {
            let text = facade
                .extract_section_context(&section.id)
                .map(|ctx| facade.section_full_text(&ctx))
                .unwrap_or_default();
            SectionSeed { id: section.id.clone(), title: section.title.clone(), text }
        })
        .collect()
}

fn build_transform_prompt(
    kind: TransformKind,
    title: &str,
    text: &str,
    target_language: Option<&str>,
    style: Option<&str>,
) -> String {
    match kind {
        TransformKind::Summarize => {
            let style = style.unwrap_or("concise, neutral");
            format!(
                "Summarize the section \"{title}\" in a {style} style. Return only the summary text.\n\n{text}"
            )
        }
        TransformKind::Translate => {
            let language = target_language.unwrap_or("English");
            format!(
                "Translate the section \"{title}\" into {language}, preserving paragraph breaks. Return only the translated text.\n\n{text}"
            )
        }
    }
}

/// Runs one document-agent pass: serial, one section at a time, with
/// cancellation polled between task transitions.
pub struct AgentRunner {
    llm: Arc<dyn LlmTransport>,
    min_section_chars: usize,
}

impl AgentRunner {
    pub fn new(llm: Arc<dyn LlmTransport>) -> Self {
        Self { llm, min_section_chars: DEFAULT_MIN_SECTION_CHARS }
    }

    pub fn with_min_section_chars(mut self, min_section_chars: usize) -> Self {
        self.min_section_chars = min_section_chars;
        self
    }

    /// Run the transformation over every seed in document order.
    ///
    /// `cancel` is checked once at the top of every task transition; a
    /// task already in flight (LLM call plus mutation) always completes
    /// before the loop honors a cancellation request, per spec.md §5.
    pub async fn run(
        &self,
        sections: Vec<SectionSeed>,
        kind: TransformKind,
        target_language: Option<String>,
        style: Option<String>,
        mutation: &mut dyn EditorMutationFacade,
        cancel: Arc<AtomicBool>,
        mut on_change: impl FnMut(&AgentState),
    ) -> AgentState {
        let tasks: Vec<AgentTask> =
            sections.iter().map(|s| AgentTask::pending(s.id.clone(), s.title.clone())).collect();
        let mut state = AgentState::new(tasks);
        state.status = AgentOverallStatus::Running;
        on_change(&state);

        for (index, seed) in sections.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                debug!(index, "agent.run: canceled before task transition");
                state.status = AgentOverallStatus::Canceled;
                on_change(&state);
                return state;
            }

            state.current_index = index;
            state.tasks[index].status = AgentTaskStatus::Running;
            on_change(&state);

            if seed.text.chars().count() < self.min_section_chars {
                state.tasks[index].status = AgentTaskStatus::Skipped;
                state.tasks[index].error =
                    Some(format!("section text shorter than {} characters", self.min_section_chars));
                state.recompute_counters();
                on_change(&state);
                continue;
            }

            let prompt =
                build_transform_prompt(kind, &seed.title, &seed.text, target_language.as_deref(), style.as_deref());
            let result = self
                .llm
                .chat(&[LlmMessage::system(SYSTEM_PROMPT), LlmMessage::user(prompt)])
                .await;

            if !result.success {
                warn!(section = seed.id.as_str(), error = ?result.error, "agent.run: transform call failed");
                state.tasks[index].status = AgentTaskStatus::Error;
                state.tasks[index].error = result.error;
                state.recompute_counters();
                on_change(&state);
                continue;
            }

            let output = result.content.unwrap_or_default();
            let applied = match kind {
                TransformKind::Summarize => mutation.insert_section_summary(&seed.id, &output),
                TransformKind::Translate => mutation.replace_section_body(&seed.id, &output),
            };

            match applied {
                Ok(()) => {
                    state.tasks[index].status = AgentTaskStatus::Success;
                    state.tasks[index].output = Some(output);
                }
                Err(message) => {
                    state.tasks[index].status = AgentTaskStatus::Error;
                    state.tasks[index].error = Some(message);
                }
            }
            state.recompute_counters();
            on_change(&state);
        }

        state.status =
            if state.error_count > 0 { AgentOverallStatus::Error } else { AgentOverallStatus::Success };
        on_change(&state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmChatResult, MockLlmTransport};
    use docmind_context::{EditorMutationFacade, SectionContext};
    use docmind_core::BlockId;

    struct RecordingMutation {
        applied: Vec<(String, String)>,
    }

    impl EditorMutationFacade for RecordingMutation {
        fn insert_section_summary(&mut self, section_id: &SectionId, text: &str) -> Result<(), String> {
            self.applied.push((section_id.as_str().to_string(), text.to_string()));
            Ok(())
        }

        fn replace_section_body(&mut self, section_id: &SectionId, new_content: &str) -> Result<(), String> {
            self.applied.push((section_id.as_str().to_string(), new_content.to_string()));
            Ok(())
        }

        fn apply_section_ai_action(
            &mut self,
            _action_kind: &str,
            _section_id: &SectionId,
            _context: &SectionContext,
        ) -> Result<(), String> {
            Ok(())
        }
    }

    fn seeds(n: usize) -> Vec<SectionSeed> {
        (0..n)
            .map(|i| SectionSeed {
                id: SectionId::from_title_block(&BlockId::new(format!("h{i}"))),
                title: format!("Section {i}"),
                text: "x".repeat(80),
            })
            .collect()
    }

    #[tokio::test]
    async fn cancel_after_third_transition_leaves_rest_pending() {
        let responses: Vec<LlmChatResult> = (0..8).map(|i| LlmChatResult::ok(format!("summary {i}"))).collect();
        let transport = Arc::new(MockLlmTransport::new(responses));
        let runner = AgentRunner::new(transport);
        let mut mutation = RecordingMutation { applied: vec![] };
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();

        let mut transitions = 0usize;
        let state = runner
            .run(seeds(8), TransformKind::Summarize, None, None, &mut mutation, cancel.clone(), |state| {
                if state.status == AgentOverallStatus::Running && state.tasks[state.current_index].status == AgentTaskStatus::Success {
                    transitions += 1;
                    if transitions == 3 {
                        cancel_clone.store(true, Ordering::SeqCst);
                    }
                }
            })
            .await;

        assert_eq!(state.status, AgentOverallStatus::Canceled);
        assert_eq!(state.success_count, 3);
        assert_eq!(state.tasks[0].status, AgentTaskStatus::Success);
        assert_eq!(state.tasks[2].status, AgentTaskStatus::Success);
        assert_eq!(state.tasks[3].status, AgentTaskStatus::Pending);
        assert_eq!(state.tasks[7].status, AgentTaskStatus::Pending);
    }

    #[tokio::test]
    async fn short_sections_are_skipped_not_errored() {
        let transport = Arc::new(MockLlmTransport::new(vec![]));
        let runner = AgentRunner::new(transport);
        let mut mutation = RecordingMutation { applied: vec![] };
        let mut short_seeds = seeds(1);
        short_seeds[0].text = "short".to_string();

        let state = runner
            .run(short_seeds, TransformKind::Summarize, None, None, &mut mutation, Arc::new(AtomicBool::new(false)), |_| {})
            .await;

        assert_eq!(state.status, AgentOverallStatus::Success);
        assert_eq!(state.tasks[0].status, AgentTaskStatus::Skipped);
        assert!(mutation.applied.is_empty());
    }

    #[tokio::test]
    async fn a_failed_section_does_not_halt_the_run() {
        let transport = Arc::new(MockLlmTransport::new(vec![
            LlmChatResult::err("transport down"),
            LlmChatResult::ok("second summary"),
        ]));
        let runner = AgentRunner::new(transport);
        let mut mutation = RecordingMutation { applied: vec![] };

        let state = runner
            .run(seeds(2), TransformKind::Summarize, None, None, &mut mutation, Arc::new(AtomicBool::new(false)), |_| {})
            .await;

        assert_eq!(state.status, AgentOverallStatus::Error);
        assert_eq!(state.tasks[0].status, AgentTaskStatus::Error);
        assert_eq!(state.tasks[1].status, AgentTaskStatus::Success);
        assert_eq!(mutation.applied.len(), 1);
    }
}
