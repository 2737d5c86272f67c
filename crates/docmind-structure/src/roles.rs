//! Paragraph-role tagging: assigns every block exactly one `ParagraphRole`.

use crate::features::BlockFeatures;
use docmind_core::{BlockId, ParagraphRole, SectionNode, UnifiedBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static META_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^(author|作者)\s*[:：]").unwrap(),
        Regex::new(r"(?i)^(date|日期)\s*[:：]").unwrap(),
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(),
        Regex::new(r"(?i)^(version|版本)\s*[:：]?\s*v?\d").unwrap(),
        Regex::new(r"(?i)^copyright\b|^©|^all rights reserved").unwrap(),
    ]
});

fn matches_meta_pattern(text: &str) -> bool {
    let trimmed = text.trim();
    META_PATTERNS.iter().any(|re| re.is_match(trimmed))
}

/// Assign a `ParagraphRole` to every block. Title blocks named by the
/// section tree get `section_title`, except the first level-1 section's
/// title which is promoted to `doc_title` (strategy `first_h1`).
pub fn tag_roles<B: UnifiedBlock>(blocks: &[B], roots: &[SectionNode]) -> HashMap<BlockId, ParagraphRole> {
    let mut roles = HashMap::new();

    let flattened: Vec<&SectionNode> = roots.iter().flat_map(|r| r.flatten()).collect();
    for section in &flattened {
        roles.insert(section.title_block.clone(), ParagraphRole::SectionTitle);
    }
    if let Some(doc_title) = flattened.iter().find(|s| s.level == 1) {
        roles.insert(doc_title.title_block.clone(), ParagraphRole::DocTitle);
    }

    for block in blocks {
        let id = block.identity().clone();
        if roles.contains_key(&id) {
            continue;
        }

        let kind = block.kind();
        let role = if kind.is_list() {
            ParagraphRole::ListItem
        } else if kind.is_quote() {
            ParagraphRole::Quote
        } else {
            let features = BlockFeatures::extract(block);
            if features.is_near_top && features.single_line && matches_meta_pattern(block.text()) {
                ParagraphRole::Meta
            } else {
                ParagraphRole::Body
            }
        };
        roles.insert(id, role);
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::{Block, BlockKind, Confidence, HeadingSource, Provenance, SectionId};

    fn section(block_id: &str, level: u8, start: usize) -> SectionNode {
        SectionNode {
            id: SectionId::from_title_block(&BlockId::new(block_id)),
            level,
            title_block: BlockId::new(block_id),
            title: block_id.to_string(),
            start_index: start,
            end_index: start + 1,
            owned_paragraphs: vec![],
            children: vec![],
            provenance: Provenance {
                source: HeadingSource::Heading,
                confidence: Confidence::High,
                raw_score: 5,
                style_score: 0,
            },
        }
    }

    #[test]
    fn first_level_one_section_title_is_promoted_to_doc_title() {
        let blocks = vec![
            Block::new("h1", BlockKind::Heading { level: 1 }, "Report", 0),
            Block::new("p1", BlockKind::Paragraph, "Author: Jane Doe", 1),
            Block::new("h2", BlockKind::Heading { level: 1 }, "Background", 2),
        ];
        let roots = vec![section("h1", 1, 0), section("h2", 1, 2)];
        let roles = tag_roles(&blocks, &roots);
        assert_eq!(roles[&BlockId::new("h1")], ParagraphRole::DocTitle);
        assert_eq!(roles[&BlockId::new("h2")], ParagraphRole::SectionTitle);
        assert_eq!(roles[&BlockId::new("p1")], ParagraphRole::Meta);
    }

    #[test]
    fn plain_paragraph_is_body() {
        let blocks = vec![Block::new(
            "p1",
            BlockKind::Paragraph,
            "This is a normal paragraph with no special markers at all.",
            4,
        )];
        let roles = tag_roles(&blocks, &[]);
        assert_eq!(roles[&BlockId::new("p1")], ParagraphRole::Body);
    }

    #[test]
    fn list_block_is_list_item() {
        let blocks = vec![Block::new("l1", BlockKind::List, "- item one", 1)];
        let roles = tag_roles(&blocks, &[]);
        assert_eq!(roles[&BlockId::new("l1")], ParagraphRole::ListItem);
    }
}
