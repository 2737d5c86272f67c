//! Types describing a parsed `[INTENT]`/`[REPLY]` pair.

use serde::{Deserialize, Serialize};

/// Conversational mode carried by an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentMode {
    Chat,
    Edit,
}

/// The closed set of actions a copilot turn may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    RewriteSection,
    RewriteParagraph,
    SummarizeSection,
    SummarizeDocument,
    HighlightTerms,
}

/// Target scope named by an intent: `document` has no section identity,
/// `section` always carries one (possibly a sentinel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScope {
    Document,
    Section,
}

/// A section identity that may be a real key or one of the two sentinels
/// the model is allowed to emit instead of guessing at a real one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRef {
    Current,
    Auto,
    Id(String),
}

impl SectionRef {
    fn from_raw(raw: &str) -> Self {
        match raw {
            "current" => SectionRef::Current,
            "auto" => SectionRef::Auto,
            other => SectionRef::Id(other.to_string()),
        }
    }
}

// Hand-rolled rather than `#[serde(untagged)]`: untagged string variants all
// deserialize from the same JSON shape, so serde would always pick the
// first one that matches instead of distinguishing the sentinels from a
// real id.
impl Serialize for SectionRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let raw = match self {
            SectionRef::Current => "current",
            SectionRef::Auto => "auto",
            SectionRef::Id(id) => id.as_str(),
        };
        serializer.serialize_str(raw)
    }
}

impl<'de> Deserialize<'de> for SectionRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SectionRef::from_raw(&raw))
    }
}

/// `target.sectionId` is required for section-scoped actions; `scope` is
/// implied by whether a section identity is present at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentTarget {
    pub scope: TargetScope,
    #[serde(rename = "sectionId", skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionRef>,
}

/// Which paragraph within the target section a `rewrite_paragraph` action
/// addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRef {
    Current,
    Previous,
    Next,
    Nth,
}

/// Optional, action-dependent parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentParams {
    #[serde(rename = "paragraphRef", skip_serializing_if = "Option::is_none")]
    pub paragraph_ref: Option<ParagraphRef>,
    #[serde(rename = "paragraphIndex", skip_serializing_if = "Option::is_none")]
    pub paragraph_index: Option<u32>,
    #[serde(rename = "terms", skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<String>>,
}

/// The JSON body of an `[INTENT]` block, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIntent {
    pub mode: IntentMode,
    pub action: IntentAction,
    pub target: IntentTarget,
    #[serde(default)]
    pub params: IntentParams,
}

/// A validated `RawIntent`: `target.section_id` is guaranteed present for
/// `TargetScope::Section`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopilotIntent {
    pub mode: IntentMode,
    pub action: IntentAction,
    pub target: IntentTarget,
    pub params: IntentParams,
}

impl CopilotIntent {
    /// `mode=edit` and a document-mutating action; everything else (chat
    /// replies, or a well-formed edit intent outside the mutating set) is
    /// handled as a conversational reply instead of being executed.
    pub fn is_executable(&self) -> bool {
        self.mode == IntentMode::Edit
            && matches!(
                self.action,
                IntentAction::RewriteSection
                    | IntentAction::RewriteParagraph
                    | IntentAction::SummarizeSection
            )
    }
}

/// Outcome of attempting to parse one `[INTENT]` block.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseStatus {
    Ok,
    Missing,
    JsonError(String),
    ValidationError(String),
}

/// The full result of parsing a turn of LLM output: at most one intent, plus
/// whatever text should be shown to the user as the conversational reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTurn {
    pub status: ParseStatus,
    pub intent: Option<CopilotIntent>,
    pub reply_text: String,
}
