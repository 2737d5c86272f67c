//! Stack-based construction of the section tree from an ordered candidate list.

use crate::level::assign_level;
use crate::scoring::HeadingCandidate;
use docmind_core::{Provenance, SectionId, SectionNode, UnifiedBlock};

/// Attach a finished node to whatever is now on top of the open-section
/// stack, or to `roots` if the stack has drained.
fn attach(stack: &mut Vec<SectionNode>, roots: &mut Vec<SectionNode>, node: SectionNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        roots.push(node);
    }
}

/// Build a nested section forest from heading candidates already ordered by
/// document position. Uses an explicit stack of still-open sections: a new
/// candidate at level <= the stack top's level closes that section (and any
/// other open sections at or below the new level) before opening its own.
pub fn build_tree(candidates: &[HeadingCandidate]) -> Vec<SectionNode> {
    let mut roots: Vec<SectionNode> = vec![];
    let mut stack: Vec<SectionNode> = vec![];

    for candidate in candidates {
        let level = assign_level(candidate);
        let node = SectionNode {
            id: SectionId::from_title_block(&candidate.block_id),
            level,
            title_block: candidate.block_id.clone(),
            title: candidate.title.clone(),
            start_index: candidate.position,
            end_index: candidate.position,
            owned_paragraphs: vec![],
            children: vec![],
            provenance: Provenance {
                source: candidate.source,
                confidence: candidate.confidence,
                raw_score: candidate.raw_score,
                style_score: candidate.style_score,
            },
        };

        while stack.last().is_some_and(|top| top.level >= level) {
            let done = stack.pop().unwrap();
            attach(&mut stack, &mut roots, done);
        }
        stack.push(node);
    }

    while let Some(done) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }

    roots
}

/// Fill in `end_index` for every node so that it covers the whole half-open
/// range up to the next sibling at the same or a shallower level, recursing
/// so a parent's end always matches its deepest child's.
pub fn finalize_ranges(nodes: &mut [SectionNode], total_blocks: usize) {
    let len = nodes.len();
    for i in 0..len {
        let next_start = if i + 1 < len {
            nodes[i + 1].start_index
        } else {
            total_blocks
        };
        finalize_ranges(&mut nodes[i].children, next_start);
        let own_end = match nodes[i].children.last() {
            Some(last_child) => last_child.end_index,
            None => next_start,
        };
        nodes[i].end_index = own_end;
    }
}

/// Assign each non-heading block to the deepest section whose range it
/// falls in but that none of its children claim first.
pub fn assign_owned_paragraphs<B: UnifiedBlock>(nodes: &mut [SectionNode], blocks: &[B]) {
    for node in nodes.iter_mut() {
        assign_owned_paragraphs(&mut node.children, blocks);

        let boundary = node
            .children
            .first()
            .map(|c| c.start_index)
            .unwrap_or(node.end_index);

        for block in blocks {
            let pos = block.position();
            if pos > node.start_index && pos < boundary && !block.kind().is_heading() {
                node.owned_paragraphs.push(block.identity().clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmind_core::{Confidence, HeadingSource};

    fn candidate(position: usize, original_level: u8) -> HeadingCandidate {
        HeadingCandidate {
            block_id: format!("b{position}").into(),
            position,
            title: format!("Title {position}"),
            raw_score: 5,
            style_score: 0,
            font_delta: 0.0,
            source: HeadingSource::Heading,
            confidence: Confidence::High,
            original_level: Some(original_level),
            is_near_top: position <= 2,
            is_first_screen: position < 5,
            has_numbering_prefix: false,
        }
    }

    #[test]
    fn sibling_headings_at_same_level_stay_flat() {
        let candidates = vec![candidate(0, 1), candidate(5, 1)];
        let roots = build_tree(&candidates);
        assert_eq!(roots.len(), 2);
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn deeper_level_nests_under_previous_heading() {
        let candidates = vec![candidate(0, 1), candidate(3, 2), candidate(7, 1)];
        let roots = build_tree(&candidates);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].title, "Title 3");
    }

    #[test]
    fn finalize_ranges_extends_parent_to_last_child() {
        let candidates = vec![candidate(0, 1), candidate(3, 2)];
        let mut roots = build_tree(&candidates);
        finalize_ranges(&mut roots, 10);
        assert_eq!(roots[0].end_index, 10);
        assert_eq!(roots[0].children[0].end_index, 10);
    }
}
