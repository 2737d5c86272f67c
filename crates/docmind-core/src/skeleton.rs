//! The LLM-facing projection of the section tree.

use crate::confidence::Confidence;
use crate::section::{Provenance, SectionId};
use serde::{Deserialize, Serialize};

/// Semantic role assigned to a skeleton node during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Chapter,
    Section,
    Subsection,
    Appendix,
    Meta,
}

/// Coarse language hint derived from title character composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageHint {
    Zh,
    En,
    Mixed,
    Other,
}

/// One node of the LLM-facing skeleton tree: parallel to a `SectionNode` but
/// stripped to what a prompt needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonNode {
    pub id: SectionId,
    pub role: SemanticRole,
    /// e.g. "第1章", "1.1", "2".
    pub display_index: String,
    pub parent: Option<SectionId>,
    pub title: String,
    pub paragraph_count: usize,
    pub provenance: Provenance,
    pub children: Vec<SkeletonNode>,
}

impl SkeletonNode {
    pub fn flatten(&self) -> Vec<&SkeletonNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    pub fn is_chapter(&self) -> bool {
        matches!(self.role, SemanticRole::Chapter)
    }
}

/// Aggregated, document-wide metadata attached to the skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMeta {
    pub chapter_count: usize,
    pub section_count: usize,
    pub has_intro: bool,
    pub has_conclusion: bool,
    pub language_hint: LanguageHint,
    pub global_confidence: Confidence,
    pub body_font_baseline: f32,
}
