//! Global structure-confidence rollup.

use docmind_core::{Confidence, SectionNode};

const HIGH_SHARE_THRESHOLD: f64 = 0.70;
const LOW_SHARE_THRESHOLD_FOR_HIGH: f64 = 0.10;
const LOW_SHARE_THRESHOLD_FOR_LOW: f64 = 0.50;

/// Roll up every section's per-node confidence into one document-wide grade:
/// `high` when at least 70% of sections are high-confidence and fewer than
/// 10% are low; `low` when at least half of sections are low-confidence;
/// `medium` otherwise.
pub fn rollup(roots: &[SectionNode]) -> Confidence {
    let sections: Vec<&SectionNode> = roots.iter().flat_map(|r| r.flatten()).collect();
    if sections.is_empty() {
        return Confidence::Low;
    }

    let total = sections.len() as f64;
    let high = sections
        .iter()
        .filter(|s| s.provenance.confidence == Confidence::High)
        .count() as f64;
    let low = sections
        .iter()
        .filter(|s| s.provenance.confidence == Confidence::Low)
        .count() as f64;

    let high_share = high / total;
    let low_share = low / total;

    if high_share >= HIGH_SHARE_THRESHOLD && low_share < LOW_SHARE_THRESHOLD_FOR_HIGH {
        Confidence::High
    } else if low_share >= LOW_SHARE_THRESHOLD_FOR_LOW {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}
