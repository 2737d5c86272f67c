//! The inferred section tree.

use crate::block::BlockId;
use crate::confidence::Confidence;
use serde::{Deserialize, Serialize};

/// A stable identity for a section, distinct from the block identity of its
/// title block (a section can in principle be re-titled without losing its
/// identity, though the current Structure Engine always derives one from
/// the title block's id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn from_title_block(title_block: &BlockId) -> Self {
        SectionId(format!("sec-{}", title_block.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a heading candidate's level/role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingSource {
    /// The editor's own heading marker, unconfirmed by style.
    Heading,
    /// Visual styling alone (font size, bold, centering, ...), with no
    /// heading marker.
    StyleInferred,
    /// Both a heading marker and corroborating style.
    Mixed,
}

/// Provenance carried from a `HeadingCandidate` into the `SectionNode` built
/// from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub source: HeadingSource,
    pub confidence: Confidence,
    /// The raw composite heading score that produced this candidate.
    pub raw_score: i32,
    /// The style-only sub-score.
    pub style_score: i32,
}

/// A node in the section tree.
///
/// Invariants (enforced by `docmind-structure::tree`, not by this type):
/// children's ranges are strictly inside the parent's range and mutually
/// disjoint; `end_index` equals the next sibling's `start_index` or the
/// parent's `end_index`; `start_index` always points at the title block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    pub id: SectionId,
    /// Logical level: 1 (chapter-like), 2, or 3.
    pub level: u8,
    pub title_block: BlockId,
    pub title: String,
    /// Half-open block range `[start_index, end_index)`.
    pub start_index: usize,
    pub end_index: usize,
    /// Paragraph blocks directly inside this section, excluding any block
    /// covered by a child section's range.
    pub owned_paragraphs: Vec<BlockId>,
    pub children: Vec<SectionNode>,
    pub provenance: Provenance,
}

impl SectionNode {
    /// Flatten this node and its descendants into document order (pre-order
    /// DFS), matching the in-document order of title blocks.
    pub fn flatten(&self) -> Vec<&SectionNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    pub fn block_range_len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, level: u8, start: usize, end: usize) -> SectionNode {
        SectionNode {
            id: SectionId(id.to_string()),
            level,
            title_block: BlockId::new(id),
            title: id.to_string(),
            start_index: start,
            end_index: end,
            owned_paragraphs: vec![],
            children: vec![],
            provenance: Provenance {
                source: HeadingSource::Heading,
                confidence: Confidence::High,
                raw_score: 5,
                style_score: 1,
            },
        }
    }

    #[test]
    fn flatten_is_preorder_dfs() {
        let mut root = leaf("a", 1, 0, 10);
        root.children.push(leaf("b", 2, 1, 5));
        root.children.push(leaf("c", 2, 5, 10));
        let flat: Vec<&str> = root.flatten().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(flat, vec!["a", "b", "c"]);
    }
}
