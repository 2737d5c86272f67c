//! Whole-document structure results.

use crate::block::BlockId;
use crate::confidence::Confidence;
use crate::role::ParagraphRole;
use crate::section::SectionNode;
use crate::skeleton::{DocMeta, SkeletonNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The full result of one Structure Engine pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocStructureSnapshot {
    pub roots: Vec<SectionNode>,
    pub paragraph_roles: HashMap<BlockId, ParagraphRole>,
    pub total_blocks: usize,
    pub total_sections: usize,
    pub doc_title_block: Option<BlockId>,
    pub body_font_baseline: f32,
    pub global_confidence: Confidence,
}

impl DocStructureSnapshot {
    /// An empty snapshot for a document with no blocks.
    pub fn empty() -> Self {
        Self {
            roots: vec![],
            paragraph_roles: HashMap::new(),
            total_blocks: 0,
            total_sections: 0,
            doc_title_block: None,
            body_font_baseline: 12.0,
            global_confidence: Confidence::Low,
        }
    }

    /// All sections, flattened in document (pre-order DFS) order.
    pub fn flatten_sections(&self) -> Vec<&SectionNode> {
        self.roots.iter().flat_map(|r| r.flatten()).collect()
    }

    pub fn role_of(&self, block: &BlockId) -> ParagraphRole {
        self.paragraph_roles
            .get(block)
            .copied()
            .unwrap_or(ParagraphRole::Unknown)
    }
}

/// The LLM-facing projection, parallel to `DocStructureSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSkeleton {
    pub roots: Vec<SkeletonNode>,
    pub meta: DocMeta,
}

impl DocSkeleton {
    pub fn flatten(&self) -> Vec<&SkeletonNode> {
        self.roots.iter().flat_map(|r| r.flatten()).collect()
    }

    pub fn chapters(&self) -> Vec<&SkeletonNode> {
        self.flatten().into_iter().filter(|n| n.is_chapter()).collect()
    }
}
