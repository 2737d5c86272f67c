//! Logical heading-level assignment.

use crate::scoring::{HeadingCandidate, STYLE_HIGH_THRESHOLD, STYLE_MEDIUM_THRESHOLD};
use docmind_core::HeadingSource;

const MAX_LEVEL: u8 = 3;

/// Defensive demotion: a block only carries the editor's level-1 marker
/// without being near the top of the document and without any corroborating
/// style score is more likely a misapplied style than a real top section.
fn should_demote_level_one(candidate: &HeadingCandidate) -> bool {
    !candidate.is_near_top && candidate.style_score < 2
}

/// Assign the logical (1..=3) level a candidate contributes to the section
/// tree, independent of whatever heading level the editor itself recorded.
pub fn assign_level(candidate: &HeadingCandidate) -> u8 {
    if let Some(original) = candidate.original_level {
        if original >= 4 {
            return MAX_LEVEL;
        }
        if original == 1 && candidate.source == HeadingSource::Heading && should_demote_level_one(candidate)
        {
            return 2;
        }
        return original.max(1);
    }

    // Style-inferred: no editor-assigned level to trust, so the style
    // signal alone decides how deep this candidate sits.
    if candidate.is_first_screen && candidate.style_score >= STYLE_HIGH_THRESHOLD {
        return 1;
    }
    if candidate.font_delta >= 4.0 {
        return if candidate.is_first_screen { 1 } else { 2 };
    }
    if candidate.font_delta >= 2.0 {
        return 2;
    }
    if candidate.has_numbering_prefix && candidate.style_score >= STYLE_MEDIUM_THRESHOLD {
        return 2;
    }
    MAX_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::Confidence;

    fn candidate(
        original_level: Option<u8>,
        source: HeadingSource,
        is_near_top: bool,
        is_first_screen: bool,
        style_score: i32,
        font_delta: f32,
        has_numbering_prefix: bool,
    ) -> HeadingCandidate {
        HeadingCandidate {
            block_id: "b".into(),
            position: 0,
            title: "t".into(),
            raw_score: 4,
            style_score,
            font_delta,
            source,
            confidence: Confidence::Medium,
            original_level,
            is_near_top,
            is_first_screen,
            has_numbering_prefix,
        }
    }

    #[test]
    fn original_level_is_respected_when_near_top() {
        let c = candidate(Some(1), HeadingSource::Heading, true, true, 0, 0.0, false);
        assert_eq!(assign_level(&c), 1);
    }

    #[test]
    fn lone_level_one_marker_far_from_top_with_no_style_demotes() {
        let c = candidate(Some(1), HeadingSource::Heading, false, false, 0, 0.0, false);
        assert_eq!(assign_level(&c), 2);
    }

    #[test]
    fn levels_above_three_clamp_to_three() {
        let c = candidate(Some(5), HeadingSource::Heading, true, true, 0, 0.0, false);
        assert_eq!(assign_level(&c), 3);
    }

    #[test]
    fn style_inferred_first_screen_strong_style_is_level_one() {
        let c = candidate(None, HeadingSource::StyleInferred, true, true, 7, 8.0, false);
        assert_eq!(assign_level(&c), 1);
    }

    #[test]
    fn style_inferred_moderate_delta_not_first_screen_is_level_two() {
        let c = candidate(None, HeadingSource::StyleInferred, false, false, 3, 4.5, false);
        assert_eq!(assign_level(&c), 2);
    }

    #[test]
    fn style_inferred_weak_signal_falls_back_to_level_three() {
        let c = candidate(None, HeadingSource::StyleInferred, false, false, 1, 0.5, false);
        assert_eq!(assign_level(&c), 3);
    }
}
