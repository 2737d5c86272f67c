//! Per-block feature extraction.

use docmind_core::{Alignment, UnifiedBlock};
use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed list of section-numbering prefixes, Chinese and English, checked
/// against the start of a block's text.
static NUMBERING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // 第一章 / 第1章 / 第十二节 / 第３段
        Regex::new(r"^第[\d一二三四五六七八九十百零〇两]+[章节段篇部卷]").unwrap(),
        // 1. / 1、 / 1.1 / 1.1.1
        Regex::new(r"^\d+(\.\d+)*[.、]").unwrap(),
        // Chapter 1 / Section 2 / Part III
        Regex::new(r"(?i)^(chapter|section|part|appendix)\s+[\divxlcdm]+").unwrap(),
        // Roman numerals: I. II. III.
        Regex::new(r"^[IVXLCDM]+[.、]").unwrap(),
        // Lettered: A. B) (a)
        Regex::new(r"^[\(\[]?[A-Za-z][\)\].、]").unwrap(),
    ]
});

const NEAR_TOP_THRESHOLD: usize = 2;
const FIRST_SCREEN_THRESHOLD: usize = 5;
const MIN_TITLE_LEN: usize = 2;
const MAX_TITLE_LEN: usize = 80;
const LONG_TEXT_THRESHOLD: usize = 150;

/// Derived, per-block features used by the heading scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFeatures {
    pub is_heading_style: bool,
    pub raw_heading_level: Option<u8>,
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    pub alignment: Alignment,
    pub text_len: usize,
    pub single_line: bool,
    pub has_numbering_prefix: bool,
    pub position: usize,
    pub is_near_top: bool,
    pub is_first_screen: bool,
}

impl BlockFeatures {
    pub fn extract<B: UnifiedBlock>(block: &B) -> Self {
        let text = block.text();
        let position = block.position();
        let style = block.style();

        Self {
            is_heading_style: block.kind().is_heading(),
            raw_heading_level: block.kind().heading_level(),
            font_size: style.font_size,
            bold: style.bold,
            italic: style.italic,
            alignment: style.alignment,
            text_len: text.chars().count(),
            single_line: !text.contains('\n'),
            has_numbering_prefix: has_numbering_prefix(text),
            position,
            is_near_top: position <= NEAR_TOP_THRESHOLD,
            is_first_screen: position < FIRST_SCREEN_THRESHOLD,
        }
    }

    pub fn is_reasonable_title_length(&self) -> bool {
        self.single_line && (MIN_TITLE_LEN..=MAX_TITLE_LEN).contains(&self.text_len)
    }

    pub fn is_overlong(&self) -> bool {
        self.text_len > LONG_TEXT_THRESHOLD
    }
}

pub fn has_numbering_prefix(text: &str) -> bool {
    let trimmed = text.trim_start();
    NUMBERING_PATTERNS.iter().any(|re| re.is_match(trimmed))
}

/// The median font size of non-heading blocks with more than 20 characters;
/// falls back to 12.0 when there isn't enough data to estimate from.
pub fn body_font_baseline<B: UnifiedBlock>(blocks: &[B]) -> f32 {
    let mut sizes: Vec<f32> = blocks
        .iter()
        .filter(|b| !b.kind().is_heading() && b.text().chars().count() > 20)
        .filter_map(|b| b.style().font_size)
        .collect();

    if sizes.is_empty() {
        return 12.0;
    }

    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sizes.len() / 2;
    if sizes.len() % 2 == 0 {
        (sizes[mid - 1] + sizes[mid]) / 2.0
    } else {
        sizes[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::{Block, BlockKind, BlockStyle};

    #[test]
    fn numbering_prefix_matches_chinese_chapter() {
        assert!(has_numbering_prefix("第一章 绪论"));
        assert!(has_numbering_prefix("第12节 背景"));
    }

    #[test]
    fn numbering_prefix_matches_arabic_dotted() {
        assert!(has_numbering_prefix("1.1 Overview"));
        assert!(has_numbering_prefix("2、背景"));
    }

    #[test]
    fn numbering_prefix_rejects_plain_text() {
        assert!(!has_numbering_prefix("This is just a sentence."));
    }

    #[test]
    fn near_top_and_first_screen_flags() {
        let block = Block::new("b", BlockKind::Paragraph, "x".repeat(25), 1);
        let features = BlockFeatures::extract(&block);
        assert!(features.is_near_top);
        assert!(features.is_first_screen);

        let block = Block::new("b", BlockKind::Paragraph, "x", 6);
        let features = BlockFeatures::extract(&block);
        assert!(!features.is_near_top);
        assert!(!features.is_first_screen);
    }

    #[test]
    fn body_font_baseline_defaults_without_data() {
        let blocks: Vec<Block> = vec![Block::new("b", BlockKind::Paragraph, "short", 0)];
        assert_eq!(body_font_baseline(&blocks), 12.0);
    }

    #[test]
    fn body_font_baseline_is_median_of_qualifying_blocks() {
        let blocks: Vec<Block> = vec![
            Block::new("a", BlockKind::Paragraph, "x".repeat(30), 0)
                .with_style(BlockStyle::new().with_font_size(10.0)),
            Block::new("b", BlockKind::Paragraph, "x".repeat(30), 1)
                .with_style(BlockStyle::new().with_font_size(12.0)),
            Block::new("c", BlockKind::Paragraph, "x".repeat(30), 2)
                .with_style(BlockStyle::new().with_font_size(14.0)),
        ];
        assert_eq!(body_font_baseline(&blocks), 12.0);
    }
}
