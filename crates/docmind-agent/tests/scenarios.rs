//! End-to-end coverage of the named scenarios from spec.md §8 that exercise
//! the Copilot Runtime and Document Agent Runner together, through the
//! public API only.

use docmind_agent::{
    AgentOverallStatus, AgentRunner, AgentTaskStatus, CopilotRuntime, MockLlmTransport, ResolvedKind,
    SessionState, TransformKind, TurnOutcome,
};
use docmind_context::{EditorMutationFacade, EditorReadFacade, SectionContext, Selection};
use docmind_core::{Block, BlockId, BlockKind};
use docmind_structure::{build, project};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct FixtureReader {
    blocks: Vec<Block>,
    selection: Option<Selection>,
}

impl EditorReadFacade for FixtureReader {
    fn read_blocks(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    fn extract_section_context(&self, section_id: &docmind_core::SectionId) -> Option<SectionContext> {
        let snapshot = build(&self.blocks);
        let section = snapshot.flatten_sections().into_iter().find(|s| &s.id == section_id)?;
        Some(SectionContext { blocks: self.blocks[section.start_index..section.end_index].to_vec() })
    }

    fn current_selection(&self) -> Option<Selection> {
        self.selection.clone()
    }
}

#[derive(Default)]
struct FixtureMutation {
    applied: RefCell<Vec<(String, String)>>,
}

impl EditorMutationFacade for FixtureMutation {
    fn insert_section_summary(&mut self, section_id: &docmind_core::SectionId, text: &str) -> Result<(), String> {
        self.applied.borrow_mut().push((section_id.as_str().to_string(), text.to_string()));
        Ok(())
    }

    fn replace_section_body(&mut self, section_id: &docmind_core::SectionId, new_content: &str) -> Result<(), String> {
        self.applied.borrow_mut().push((section_id.as_str().to_string(), new_content.to_string()));
        Ok(())
    }

    fn apply_section_ai_action(
        &mut self,
        action_kind: &str,
        section_id: &docmind_core::SectionId,
        _context: &SectionContext,
    ) -> Result<(), String> {
        self.applied.borrow_mut().push((section_id.as_str().to_string(), action_kind.to_string()));
        Ok(())
    }
}

fn three_paragraph_section() -> Vec<Block> {
    vec![
        Block::new("h1", BlockKind::Heading { level: 1 }, "Chapter One", 0),
        Block::new("p1", BlockKind::Paragraph, "First paragraph of reasonable length to read.", 1),
        Block::new("p2", BlockKind::Paragraph, "Second paragraph of reasonable length to read.", 2),
        Block::new("p3", BlockKind::Paragraph, "Third paragraph of reasonable length to read.", 3),
    ]
}

fn eight_section_document() -> Vec<Block> {
    let mut blocks = vec![];
    for i in 0..8 {
        let pos = i * 2;
        blocks.push(Block::new(format!("h{i}"), BlockKind::Heading { level: 1 }, format!("Chapter {i}"), pos));
        blocks.push(Block::new(
            format!("p{i}"),
            BlockKind::Paragraph,
            "Body text long enough to clear the minimum section length for a transform to run.",
            pos + 1,
        ));
    }
    blocks
}

/// Scenario 3: current section has 3 paragraphs, cursor in the second.
/// `rewrite_paragraph` with `paragraphRef=current` resolves to paragraph
/// index 2 and the second paragraph's block identity.
#[tokio::test]
async fn scenario_3_paragraph_rewrite_resolves_to_cursor_paragraph() {
    let blocks = three_paragraph_section();
    let snapshot = build(&blocks);
    let skeleton = project(&snapshot);
    let section_id = snapshot.roots[0].id.clone();

    let reply = "[INTENT]{\"mode\":\"edit\",\"action\":\"rewrite_paragraph\",\"target\":{\"scope\":\"section\",\"sectionId\":\"current\"},\"params\":{\"paragraphRef\":\"current\"}}[/INTENT][REPLY]done[/REPLY]";
    let transport = Arc::new(MockLlmTransport::reply(reply));
    let runtime = CopilotRuntime::new(transport);

    let mut session = SessionState::new();
    session.open_document("doc-1");
    session.set_scope(docmind_context::Scope::Section, Some(section_id));

    let reader = FixtureReader { blocks, selection: Some(Selection { block_id: BlockId::new("p2") }) };
    let mut mutation = FixtureMutation::default();

    let outcome = runtime
        .run_turn(&mut session, Some(&reader), &mut mutation, &snapshot, &skeleton, "帮我改写这一段")
        .await
        .expect("turn should succeed");

    let TurnOutcome::EditApplied { target, .. } = outcome else {
        panic!("expected an applied edit");
    };
    assert_eq!(target.kind, ResolvedKind::Paragraph);
    assert_eq!(target.paragraph_index, Some(2));
    assert_eq!(target.block_id, Some(BlockId::new("p2")));
}

/// Scenario 4: 8-section document, agent run with summarize, cancel called
/// after the third transition. Tasks 1-3 succeed, 4-8 stay pending, overall
/// status is `canceled`, `successCount=3`.
#[tokio::test]
async fn scenario_4_cancel_after_third_transition() {
    let blocks = eight_section_document();
    let snapshot = build(&blocks);
    let reader = FixtureReader { blocks, selection: None };
    let seeds = docmind_agent::collect_section_seeds(&snapshot, &reader);

    let responses = (0..8).map(|i| docmind_agent::LlmChatResult::ok(format!("summary {i}"))).collect();
    let transport = Arc::new(MockLlmTransport::new(responses));
    let runner = AgentRunner::new(transport);
    let mut mutation = FixtureMutation::default();

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel.clone();
    let mut successes = 0usize;

    let state = runner
        .run(seeds, TransformKind::Summarize, None, None, &mut mutation, cancel, |state| {
            if state.tasks[state.current_index].status == AgentTaskStatus::Success {
                successes += 1;
                if successes == 3 {
                    cancel_clone.store(true, Ordering::SeqCst);
                }
            }
        })
        .await;

    assert_eq!(state.status, AgentOverallStatus::Canceled);
    assert_eq!(state.success_count, 3);
    for task in &state.tasks[3..] {
        assert_eq!(task.status, AgentTaskStatus::Pending);
    }
}

/// Scenario 6: the LLM omits `target.sectionId` for a section-scoped
/// action. The parser reports `validation_error`, and the runtime treats
/// the turn as chat, surfacing the `[REPLY]` text verbatim.
#[tokio::test]
async fn scenario_6_missing_section_id_surfaces_reply_text() {
    let blocks = three_paragraph_section();
    let snapshot = build(&blocks);
    let skeleton = project(&snapshot);

    let reply = "[INTENT]{\"mode\":\"edit\",\"action\":\"rewrite_section\",\"target\":{\"scope\":\"section\"}}[/INTENT][REPLY]ok[/REPLY]";
    let transport = Arc::new(MockLlmTransport::reply(reply));
    let runtime = CopilotRuntime::new(transport);

    let mut session = SessionState::new();
    session.open_document("doc-1");
    let reader = FixtureReader { blocks, selection: None };
    let mut mutation = FixtureMutation::default();

    let outcome = runtime
        .run_turn(&mut session, Some(&reader), &mut mutation, &snapshot, &skeleton, "please rewrite")
        .await
        .expect("turn should succeed");

    match outcome {
        TurnOutcome::Reply(text) => assert_eq!(text, "ok"),
        TurnOutcome::EditApplied { .. } => panic!("expected a chat fallback"),
    }
    assert!(mutation.applied.borrow().is_empty());
}
