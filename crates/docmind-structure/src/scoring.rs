//! Heading scoring: turns per-block features into heading candidates.

use crate::features::BlockFeatures;
use docmind_core::{BlockId, Confidence, HeadingSource};

/// Minimum composite score for a block to become a heading candidate.
const CANDIDATE_THRESHOLD: i32 = 3;

/// Style sub-score thresholds used both for candidacy and for
/// source/confidence and level assignment downstream.
pub const STYLE_HIGH_THRESHOLD: i32 = 6;
pub const STYLE_MEDIUM_THRESHOLD: i32 = 4;
const STYLE_LOW_THRESHOLD: i32 = 2;

/// A block whose composite heading score cleared the candidacy threshold.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    pub block_id: BlockId,
    pub position: usize,
    pub title: String,
    pub raw_score: i32,
    pub style_score: i32,
    pub font_delta: f32,
    pub source: HeadingSource,
    pub confidence: Confidence,
    pub original_level: Option<u8>,
    pub is_near_top: bool,
    pub is_first_screen: bool,
    pub has_numbering_prefix: bool,
}

/// Score the heading-node sub-score: signal contributed purely by the
/// editor's own heading marker.
fn heading_node_subscore(features: &BlockFeatures) -> i32 {
    let mut score = 0;
    if features.is_heading_style {
        score += 4;
        if let Some(level) = features.raw_heading_level {
            if level <= 2 {
                score += 1;
            }
        }
    }
    score
}

/// Score the style sub-score: signal contributed purely by visual styling,
/// independent of any heading marker. Returns `(score, font_delta)`.
fn style_subscore(features: &BlockFeatures, body_font_baseline: f32) -> (i32, f32) {
    let mut score = 0;
    let font_delta = features.font_size.map(|s| s - body_font_baseline).unwrap_or(0.0);

    if font_delta >= 6.0 {
        score += 3;
    } else if font_delta >= 4.0 {
        score += 2;
    } else if font_delta >= 2.0 {
        score += 1;
    }

    if features.bold {
        score += 2;
    }
    if features.alignment == docmind_core::Alignment::Center {
        score += 1;
    }
    if features.is_reasonable_title_length() {
        score += 1;
    }
    if features.has_numbering_prefix {
        score += 2;
    }

    if features.is_first_screen {
        if features.position == 0 {
            score += 2;
        } else if features.position <= 2 {
            score += 1;
        }
    }

    if features.is_overlong() {
        score -= 2;
    }
    if !features.single_line {
        score -= 1;
    }

    (score, font_delta)
}

/// Determine source and confidence from whether the block carries a heading
/// marker and how strong the corroborating (or standalone) style signal is.
fn source_and_confidence(is_heading_style: bool, style_score: i32) -> (HeadingSource, Confidence) {
    if is_heading_style {
        if style_score >= STYLE_MEDIUM_THRESHOLD {
            (HeadingSource::Mixed, Confidence::High)
        } else if style_score >= STYLE_LOW_THRESHOLD {
            (HeadingSource::Heading, Confidence::High)
        } else {
            (HeadingSource::Heading, Confidence::Medium)
        }
    } else if style_score >= STYLE_HIGH_THRESHOLD {
        (HeadingSource::StyleInferred, Confidence::Medium)
    } else {
        // Covers the medium-threshold band and below: `spec.md` names both
        // the >=4 and the fallback band as `style_inferred`/`low`.
        (HeadingSource::StyleInferred, Confidence::Low)
    }
}

/// Score one block's features, returning a candidate if its composite score
/// clears the candidacy threshold.
pub fn score_block(
    block_id: BlockId,
    title: String,
    features: &BlockFeatures,
    body_font_baseline: f32,
) -> Option<HeadingCandidate> {
    let node_score = heading_node_subscore(features);
    let (style_score, font_delta) = style_subscore(features, body_font_baseline);
    let raw_score = node_score + style_score;

    if raw_score < CANDIDATE_THRESHOLD {
        return None;
    }

    let (source, confidence) = source_and_confidence(features.is_heading_style, style_score);

    Some(HeadingCandidate {
        block_id,
        position: features.position,
        title,
        raw_score,
        style_score,
        font_delta,
        source,
        confidence,
        original_level: features.raw_heading_level,
        is_near_top: features.is_near_top,
        is_first_screen: features.is_first_screen,
        has_numbering_prefix: features.has_numbering_prefix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::BlockFeatures;
    use docmind_core::{Block, BlockKind, BlockStyle};

    fn features_for(block: &Block) -> BlockFeatures {
        BlockFeatures::extract(block)
    }

    #[test]
    fn heading_marked_block_is_always_a_candidate() {
        let block = Block::new("b", BlockKind::Heading { level: 1 }, "Intro", 0);
        let features = features_for(&block);
        let candidate = score_block(block.id.clone(), "Intro".into(), &features, 12.0);
        assert!(candidate.is_some());
    }

    #[test]
    fn plain_body_paragraph_is_not_a_candidate() {
        let block = Block::new(
            "b",
            BlockKind::Paragraph,
            "This is a perfectly ordinary paragraph of body text that goes on for a while.",
            10,
        );
        let features = features_for(&block);
        let candidate = score_block(block.id.clone(), "para".into(), &features, 12.0);
        assert!(candidate.is_none());
    }

    #[test]
    fn style_inferred_large_bold_centered_title_is_a_candidate() {
        let block = Block::new("b", BlockKind::Paragraph, "Chapter Title", 0)
            .with_style(
                BlockStyle::new()
                    .with_font_size(20.0)
                    .with_bold(true)
                    .with_alignment(docmind_core::Alignment::Center),
            );
        let features = features_for(&block);
        let candidate = score_block(block.id.clone(), "Chapter Title".into(), &features, 12.0)
            .expect("should be a candidate");
        assert_eq!(candidate.source, docmind_core::HeadingSource::StyleInferred);
    }

    #[test]
    fn heading_marker_with_strong_style_is_mixed_high() {
        let block = Block::new("b", BlockKind::Heading { level: 1 }, "Chapter 1", 0)
            .with_style(BlockStyle::new().with_font_size(20.0).with_bold(true));
        let features = features_for(&block);
        let candidate = score_block(block.id.clone(), "Chapter 1".into(), &features, 12.0).unwrap();
        assert_eq!(candidate.source, docmind_core::HeadingSource::Mixed);
        assert_eq!(candidate.confidence, docmind_core::Confidence::High);
    }
}
