//! Randomized checks for the tree invariants spec.md §8 states as `for all
//! block sequences` properties, rather than against one fixed fixture.

use docmind_core::{Block, BlockKind, BlockStyle, SectionNode};
use docmind_structure::build;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum BlockSpec {
    Heading { level: u8, text_len: u8 },
    Paragraph { text_len: u8 },
}

fn block_spec_strategy() -> impl Strategy<Value = BlockSpec> {
    prop_oneof![
        (1u8..=6, 2u8..60).prop_map(|(level, text_len)| BlockSpec::Heading { level, text_len }),
        (2u8..120).prop_map(|text_len| BlockSpec::Paragraph { text_len }),
    ]
}

fn to_blocks(specs: &[BlockSpec]) -> Vec<Block> {
    specs
        .iter()
        .enumerate()
        .map(|(position, spec)| match spec {
            BlockSpec::Heading { level, text_len } => Block::new(
                format!("b{position}"),
                BlockKind::Heading { level: *level },
                "H".repeat(*text_len as usize),
                position,
            )
            .with_style(BlockStyle::new().with_font_size(20.0).with_bold(true)),
            BlockSpec::Paragraph { text_len } => {
                Block::new(format!("b{position}"), BlockKind::Paragraph, "p".repeat(*text_len as usize), position)
            }
        })
        .collect()
}

fn all_sections(roots: &[SectionNode]) -> Vec<&SectionNode> {
    roots.iter().flat_map(|r| r.flatten()).collect()
}

fn collect_owned(node: &SectionNode) -> Vec<String> {
    let mut ids: Vec<String> = node.owned_paragraphs.iter().map(|b| b.as_str().to_string()).collect();
    for child in &node.children {
        ids.extend(collect_owned(child));
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// spec.md §8: "For all block sequences, the section tree is a forest
    /// whose DFS order equals the in-document order of title blocks" and
    /// "for all sections, endIndex > startIndex; children's ranges are
    /// mutually disjoint and strictly inside the parent's range."
    #[test]
    fn tree_invariants_hold_for_arbitrary_block_sequences(specs in prop::collection::vec(block_spec_strategy(), 0..40)) {
        let blocks = to_blocks(&specs);
        let snapshot = build(&blocks);

        let flattened = snapshot.flatten_sections();
        let positions: Vec<usize> = flattened.iter().map(|s| s.start_index).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        prop_assert_eq!(positions, sorted);

        for section in all_sections(&snapshot.roots) {
            prop_assert!(section.end_index > section.start_index);
            let mut prev_end = section.start_index;
            for child in &section.children {
                prop_assert!(child.start_index >= prev_end);
                prop_assert!(child.end_index <= section.end_index);
                prev_end = child.end_index;
            }
        }
    }

    /// spec.md §8: "the union of each section's owned paragraph identities
    /// with its descendants' owned paragraphs equals exactly the block
    /// identities in (startIndex, endIndex) minus title blocks", and every
    /// block maps to exactly one paragraph role.
    #[test]
    fn owned_paragraphs_and_roles_cover_every_block(specs in prop::collection::vec(block_spec_strategy(), 0..40)) {
        let blocks = to_blocks(&specs);
        let snapshot = build(&blocks);

        for section in all_sections(&snapshot.roots) {
            let owned = collect_owned(section);
            let expected: Vec<String> = blocks
                .iter()
                .filter(|b| b.position > section.start_index && b.position < section.end_index && !b.kind.is_heading())
                .map(|b| b.id.as_str().to_string())
                .collect();
            prop_assert_eq!(owned, expected);
        }

        prop_assert_eq!(snapshot.paragraph_roles.len(), blocks.len());
        for block in &blocks {
            prop_assert!(snapshot.paragraph_roles.contains_key(&block.id));
        }
    }
}
