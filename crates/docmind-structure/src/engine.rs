//! Top-level pipeline: raw blocks in, structure snapshot and skeleton out.
//!
//! Pure function, no retries, no exceptions escape: an empty block sequence
//! yields an empty snapshot at low confidence rather than an error.

use crate::confidence::rollup;
use crate::features::{body_font_baseline, BlockFeatures};
use crate::roles::tag_roles;
use crate::scoring::score_block;
use crate::skeleton;
use crate::tree::{assign_owned_paragraphs, build_tree, finalize_ranges};
use docmind_core::{DocSkeleton, DocStructureSnapshot, UnifiedBlock};
use tracing::debug;

/// Run the full Structure Engine pipeline over one document's blocks.
pub fn build<B: UnifiedBlock>(blocks: &[B]) -> DocStructureSnapshot {
    if blocks.is_empty() {
        debug!("structure.build: empty block sequence");
        return DocStructureSnapshot::empty();
    }

    let baseline = body_font_baseline(blocks);
    debug!(body_font_baseline = baseline, "structure.build: extracted features");

    let mut candidates: Vec<_> = blocks
        .iter()
        .filter_map(|b| {
            let features = BlockFeatures::extract(b);
            score_block(b.identity().clone(), b.text().to_string(), &features, baseline)
        })
        .collect();
    candidates.sort_by_key(|c| c.position);
    debug!(candidate_count = candidates.len(), "structure.build: scored headings");

    let mut roots = build_tree(&candidates);
    finalize_ranges(&mut roots, blocks.len());
    assign_owned_paragraphs(&mut roots, blocks);
    debug!(section_count = roots.iter().flat_map(|r| r.flatten()).count(), "structure.build: built tree");

    let paragraph_roles = tag_roles(blocks, &roots);
    let global_confidence = rollup(&roots);

    let doc_title_block = roots
        .iter()
        .flat_map(|r| r.flatten())
        .find(|s| s.level == 1)
        .map(|s| s.title_block.clone());

    DocStructureSnapshot {
        total_sections: roots.iter().flat_map(|r| r.flatten()).count(),
        total_blocks: blocks.len(),
        doc_title_block,
        body_font_baseline: baseline,
        global_confidence,
        paragraph_roles,
        roots,
    }
}

/// Project a structure snapshot into the LLM-facing skeleton tree.
pub fn project(snapshot: &DocStructureSnapshot) -> DocSkeleton {
    let roots = skeleton::project(&snapshot.roots);
    let meta = skeleton::build_meta(&roots, snapshot.global_confidence, snapshot.body_font_baseline);
    debug!(chapter_count = meta.chapter_count, "structure.project: built skeleton");
    DocSkeleton { roots, meta }
}
