//! The context envelope: the size-bounded, LLM-ready snapshot of a
//! document built fresh for each turn and discarded after the reply.

use docmind_core::{Confidence, DocSkeleton, SectionId};
use serde::{Deserialize, Serialize};

/// What part of the document a turn is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Selection,
    Section,
    Document,
}

/// Whether the document-scope envelope carries the full text or previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Full,
    Chunked,
}

/// The section currently being edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Focus {
    pub section_id: SectionId,
    pub title: String,
    pub text: String,
    pub char_count: usize,
    pub token_estimate: usize,
}

/// A short, previewable neighbor section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborSection {
    pub section_id: SectionId,
    pub title: String,
}

/// Previous/next/sibling sections around the focus. May be empty: the
/// envelope builder does not fail when neighbors can't be resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Neighborhood {
    pub previous: Option<NeighborSection>,
    pub next: Option<NeighborSection>,
    pub siblings: Vec<NeighborSection>,
}

/// A per-section preview used in `chunked` mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPreview {
    pub section_id: SectionId,
    pub title: String,
    pub level: u8,
    pub char_count: usize,
    pub snippet: String,
}

const PREVIEW_SNIPPET_LEN: usize = 250;

impl SectionPreview {
    pub fn snippet_of(text: &str) -> String {
        let char_count = text.chars().count();
        if char_count <= PREVIEW_SNIPPET_LEN {
            text.to_string()
        } else {
            let truncated: String = text.chars().take(PREVIEW_SNIPPET_LEN).collect();
            format!("{truncated}...")
        }
    }
}

/// A flat structural copy: the document's chapters and all sections, in
/// traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub chapters: Vec<SectionPreview>,
    pub sections: Vec<SectionPreview>,
}

/// Document-wide character/word/token/paragraph counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub char_count: usize,
    pub word_count: usize,
    pub token_estimate: usize,
    pub paragraph_count: usize,
}

/// Coarse document metadata surfaced to the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMetaSummary {
    pub title: String,
    pub has_explicit_title: bool,
}

/// Document-wide context shared across scopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub title: String,
    pub outline: Vec<SectionPreview>,
    pub previews: Vec<SectionPreview>,
    pub structure: Structure,
    pub stats: Stats,
    pub doc_meta: DocMetaSummary,
    pub skeleton: DocSkeleton,
}

/// Token budget accounting for one envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Budget {
    pub max_tokens: usize,
    pub estimated_tokens: usize,
}

/// The unit of context passed to the LLM for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocContextEnvelope {
    pub document_id: String,
    pub scope: Scope,
    pub focus: Option<Focus>,
    pub neighborhood: Neighborhood,
    pub global: Global,
    pub budget: Budget,
    pub mode: Option<Mode>,
    pub document_full_text: Option<String>,
    pub global_confidence: Confidence,
}

pub(crate) fn estimate_tokens(char_count: usize) -> usize {
    char_count.div_ceil(4)
}
