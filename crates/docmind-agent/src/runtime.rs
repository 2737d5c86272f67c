//! The Copilot Runtime (spec.md §4.5): one conversational turn, modeled as
//! a linear sequence of `await`ed steps rather than a callback chain, per
//! spec.md §9's "coroutine-like turn logic" design note.

use crate::error::{TurnError, TurnResult};
use crate::llm::{LlmMessage, LlmTransport};
use docmind_context::{
    ContextError, DocContextEnvelope, EditorMutationFacade, EditorReadFacade, EnvelopeBuilder, Scope,
};
use docmind_core::{DocSkeleton, DocStructureSnapshot, SectionId, SectionNode};
use docmind_intent::{
    parse_turn, CopilotIntent, IntentAction, IntentTarget, ParagraphRef, ParseStatus, SectionRef,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-session preferences surfaced in the system prompt.
#[derive(Debug, Clone, Default)]
pub struct UserPreferences {
    pub language: Option<String>,
    pub style: Option<String>,
}

/// Which kind of address a resolved edit target carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    Section,
    Paragraph,
}

/// A concrete editing address (spec.md §3 `ResolvedEditTarget`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEditTarget {
    pub kind: ResolvedKind,
    pub section_id: SectionId,
    pub block_id: Option<docmind_core::BlockId>,
    pub paragraph_index: Option<u32>,
}

/// The outcome of one turn: either a conversational reply, or a reply plus
/// the edit that was applied.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    Reply(String),
    EditApplied { target: ResolvedEditTarget, action: IntentAction, reply: String },
}

impl TurnOutcome {
    pub fn reply_text(&self) -> &str {
        match self {
            TurnOutcome::Reply(text) => text,
            TurnOutcome::EditApplied { reply, .. } => reply,
        }
    }
}

/// Per-document Copilot session state. Lives for the lifetime of one
/// document being open; `last_edit_context` is a runtime field only, never
/// persisted (spec.md §9).
#[derive(Debug, Clone)]
pub struct SessionState {
    pub document_id: Option<String>,
    pub scope: Scope,
    pub focus: Option<SectionId>,
    pub preferences: UserPreferences,
    pub last_task: Option<String>,
    pub last_edit_context: Option<ResolvedEditTarget>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            document_id: None,
            scope: Scope::Document,
            focus: None,
            preferences: UserPreferences::default(),
            last_task: None,
            last_edit_context: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching documents resets scope to `document` and clears focus and
    /// `last_edit_context`.
    pub fn open_document(&mut self, document_id: impl Into<String>) {
        self.document_id = Some(document_id.into());
        self.scope = Scope::Document;
        self.focus = None;
        self.last_edit_context = None;
    }

    /// Changing scope to `section` records the focus; changing it to
    /// `document` clears it.
    pub fn set_scope(&mut self, scope: Scope, focus: Option<SectionId>) {
        match scope {
            Scope::Section => self.focus = focus,
            Scope::Document => self.focus = None,
            Scope::Selection => {}
        }
        self.scope = scope;
    }
}

static FOLLOW_UP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"再改短一点|继续|接着|再改|(?i)continue|again|shorter").unwrap());

fn is_follow_up(utterance: &str) -> bool {
    FOLLOW_UP_PATTERN.is_match(utterance)
}

pub struct CopilotRuntime {
    llm: Arc<dyn LlmTransport>,
}

impl CopilotRuntime {
    pub fn new(llm: Arc<dyn LlmTransport>) -> Self {
        Self { llm }
    }

    /// Steps 1-8 of one conversational turn.
    #[allow(clippy::too_many_arguments)]
    pub async fn run_turn(
        &self,
        session: &mut SessionState,
        editor: Option<&dyn EditorReadFacade>,
        mutation: &mut dyn EditorMutationFacade,
        snapshot: &DocStructureSnapshot,
        skeleton: &DocSkeleton,
        utterance: &str,
    ) -> TurnResult<TurnOutcome> {
        // Step 1: pre-conditions.
        let document_id = session.document_id.clone().ok_or(TurnError::NoDocument)?;
        let editor = editor.ok_or(TurnError::EditorNotReady)?;

        // Step 2: build the envelope for the session's current scope.
        let builder = EnvelopeBuilder::new(editor, snapshot, skeleton, document_id, 8_000);
        let envelope = builder
            .build(session.scope, session.focus.as_ref())
            .map_err(|err| match err {
                ContextError::UnsupportedSelectionScope
                | ContextError::MissingSectionId
                | ContextError::SectionNotFound(_) => TurnError::SectionNotFound,
            })?;

        // Step 3 & 4: compose the system and user prompts.
        let system_prompt = build_system_prompt(&envelope, &session.preferences, session.last_task.as_deref());
        let user_prompt = build_user_prompt(&envelope, utterance);
        debug!(scope = ?session.scope, "copilot.run_turn: prompts composed");

        // Step 5: invoke the transport once.
        let messages = [LlmMessage::system(system_prompt), LlmMessage::user(user_prompt)];
        let result = self.llm.chat(&messages).await;
        if !result.success {
            return Err(TurnError::LlmCallFailed(result.error.unwrap_or_default()));
        }
        let raw_reply = result.content.unwrap_or_default();

        // Step 6: parse the reply.
        let parsed = parse_turn(&raw_reply);
        let intent = match parsed.status {
            ParseStatus::Ok => parsed.intent,
            ParseStatus::Missing | ParseStatus::JsonError(_) | ParseStatus::ValidationError(_) => None,
        };

        let Some(intent) = intent else {
            return Ok(TurnOutcome::Reply(parsed.reply_text));
        };

        if !intent.is_executable() {
            return Ok(TurnOutcome::Reply(parsed.reply_text));
        }

        // Step 7: target resolution.
        let target = resolve_target(&intent, session, snapshot, editor, utterance)?;

        // Step 8: dispatch.
        let section = find_section(snapshot, &target.section_id).ok_or(TurnError::SectionNotFound)?;
        let context = editor
            .extract_section_context(&target.section_id)
            .ok_or(TurnError::SectionNotFound)?;

        let action_kind = match intent.action {
            IntentAction::RewriteSection => "rewrite_section",
            // Provisional coarsening (spec.md §9 Open Questions): paragraph
            // rewrite currently delegates to the section-level action.
            IntentAction::RewriteParagraph => "rewrite_section",
            IntentAction::SummarizeSection => "summarize_section",
            IntentAction::SummarizeDocument | IntentAction::HighlightTerms => {
                unreachable!("non-executable actions are filtered out above")
            }
        };

        mutation
            .apply_section_ai_action(action_kind, &section.id, &context)
            .map_err(TurnError::EditExecutionFailed)?;

        session.last_task = Some(action_kind.to_string());
        session.last_edit_context = Some(target.clone());

        info!(action = action_kind, section = section.id.as_str(), "copilot.run_turn: edit applied");

        Ok(TurnOutcome::EditApplied { target, action: intent.action, reply: parsed.reply_text })
    }
}

fn find_section<'a>(snapshot: &'a DocStructureSnapshot, id: &SectionId) -> Option<&'a SectionNode> {
    snapshot.flatten_sections().into_iter().find(|s| &s.id == id)
}

/// Step 7: resolve a concrete `ResolvedEditTarget` for an executable
/// intent, falling back through session focus, the last edit context (on a
/// recognized follow-up utterance), then the document's first section.
fn resolve_target(
    intent: &CopilotIntent,
    session: &SessionState,
    snapshot: &DocStructureSnapshot,
    editor: &dyn EditorReadFacade,
    utterance: &str,
) -> TurnResult<ResolvedEditTarget> {
    let section_id = resolve_section_id(&intent.target, session, snapshot, utterance)?;
    let section = find_section(snapshot, &section_id).ok_or(TurnError::UnresolvableTarget)?;

    match intent.action {
        IntentAction::RewriteParagraph => resolve_paragraph_target(section, editor, intent),
        _ => Ok(ResolvedEditTarget {
            kind: ResolvedKind::Section,
            section_id: section.id.clone(),
            block_id: None,
            paragraph_index: None,
        }),
    }
}

fn resolve_section_id(
    target: &IntentTarget,
    session: &SessionState,
    snapshot: &DocStructureSnapshot,
    utterance: &str,
) -> TurnResult<SectionId> {
    // A real outline key takes priority over every fallback.
    if let Some(SectionRef::Id(raw)) = &target.section_id {
        let candidate = SectionId(raw.clone());
        if find_section(snapshot, &candidate).is_some() {
            return Ok(candidate);
        }
    }

    if let Some(focus) = &session.focus {
        if find_section(snapshot, focus).is_some() {
            return Ok(focus.clone());
        }
    }

    if is_follow_up(utterance) {
        if let Some(last) = &session.last_edit_context {
            if find_section(snapshot, &last.section_id).is_some() {
                return Ok(last.section_id.clone());
            }
        }
    }

    snapshot
        .flatten_sections()
        .first()
        .map(|s| s.id.clone())
        .ok_or(TurnError::UnresolvableTarget)
}

fn resolve_paragraph_target(
    section: &SectionNode,
    editor: &dyn EditorReadFacade,
    intent: &CopilotIntent,
) -> TurnResult<ResolvedEditTarget> {
    let paragraphs = &section.owned_paragraphs;
    if paragraphs.is_empty() {
        return Err(TurnError::UnresolvableTarget);
    }

    let current_index = editor
        .current_selection()
        .and_then(|selection| paragraphs.iter().position(|b| *b == selection.block_id));

    let paragraph_ref = intent.params.paragraph_ref.unwrap_or(ParagraphRef::Current);
    let index = match paragraph_ref {
        ParagraphRef::Current => current_index.unwrap_or(0),
        ParagraphRef::Previous => current_index
            .and_then(|i| i.checked_sub(1))
            .ok_or(TurnError::UnresolvableTarget)?,
        ParagraphRef::Next => current_index
            .map(|i| i + 1)
            .filter(|i| *i < paragraphs.len())
            .ok_or(TurnError::UnresolvableTarget)?,
        ParagraphRef::Nth => {
            let n = intent.params.paragraph_index.ok_or(TurnError::UnresolvableTarget)? as usize;
            if n == 0 || n > paragraphs.len() {
                return Err(TurnError::UnresolvableTarget);
            }
            n - 1
        }
    };

    if index >= paragraphs.len() {
        return Err(TurnError::UnresolvableTarget);
    }

    Ok(ResolvedEditTarget {
        kind: ResolvedKind::Paragraph,
        section_id: section.id.clone(),
        block_id: Some(paragraphs[index].clone()),
        paragraph_index: Some((index + 1) as u32),
    })
}

const HARD_CONSTRAINTS: &str = "Never fabricate numbers about document structure. The structure, \
stats, and skeleton JSON below are your only source of truth for counts and titles.";

fn build_system_prompt(envelope: &DocContextEnvelope, preferences: &UserPreferences, last_task: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str(HARD_CONSTRAINTS);
    prompt.push_str("\n\nYou are a writing copilot embedded in a word processor. ");
    prompt.push_str("You may reply conversationally, or request an edit using the tagged protocol below.\n\n");
    prompt.push_str("Capabilities: rewrite_section, rewrite_paragraph, summarize_section, summarize_document, highlight_terms.\n\n");

    prompt.push_str("Document outline (JSON):\n");
    prompt.push_str(&serde_json::to_string(&envelope.global.outline).unwrap_or_default());
    prompt.push_str("\n\nStructure (JSON):\n");
    prompt.push_str(&serde_json::to_string(&envelope.global.structure).unwrap_or_default());
    prompt.push_str("\n\nStats (JSON):\n");
    prompt.push_str(&serde_json::to_string(&envelope.global.stats).unwrap_or_default());
    prompt.push_str("\n\nSkeleton (JSON):\n");
    prompt.push_str(&serde_json::to_string(&envelope.global.skeleton).unwrap_or_default());

    if let Some(full_text) = &envelope.document_full_text {
        prompt.push_str("\n\nFull document text:\n");
        prompt.push_str(full_text);
    }

    prompt.push_str(
        "\n\nOutput format:\n[INTENT]{\"mode\":\"edit\",\"action\":\"rewrite_section\",\
\"target\":{\"scope\":\"section\",\"sectionId\":\"current\"}}[/INTENT]\n[REPLY]Natural language reply.[/REPLY]\n\
For a chat-only turn: [INTENT]{\"mode\":\"chat\",\"action\":\"highlight_terms\",\"target\":{\"scope\":\"document\"}}[/INTENT]\n[REPLY]...[/REPLY]",
    );

    if let Some(language) = &preferences.language {
        prompt.push_str(&format!("\n\nUser language preference: {language}."));
    }
    if let Some(style) = &preferences.style {
        prompt.push_str(&format!(" User style preference: {style}."));
    }
    if let Some(last_task) = last_task {
        prompt.push_str(&format!("\n\nMost recent task performed: {last_task}."));
    }

    prompt
}

fn build_user_prompt(envelope: &DocContextEnvelope, utterance: &str) -> String {
    match &envelope.focus {
        Some(focus) => format!("{utterance}\n\n[Focused section: {}]\n{}", focus.title, focus.text),
        None => utterance.to_string(),
    }
}
