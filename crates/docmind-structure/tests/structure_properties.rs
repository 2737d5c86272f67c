use docmind_core::{Block, BlockKind, BlockStyle, SectionNode};
use docmind_structure::build;

/// A 5-chapter document with explicit heading markers, matching the shape
/// used by spec scenario 1 (`有几章?` resolving to 5 chapters).
fn five_chapter_document() -> Vec<Block> {
    let mut blocks = vec![];
    let mut position = 0;
    for chapter in 1..=5 {
        blocks.push(Block::new(
            format!("h{chapter}"),
            BlockKind::Heading { level: 1 },
            format!("Chapter {chapter}"),
            position,
        ));
        position += 1;
        blocks.push(Block::new(
            format!("p{chapter}"),
            BlockKind::Paragraph,
            format!("This is the body text that introduces chapter {chapter} in full."),
            position,
        ));
        position += 1;
    }
    blocks
}

fn all_sections(roots: &[SectionNode]) -> Vec<&SectionNode> {
    roots.iter().flat_map(|r| r.flatten()).collect()
}

#[test]
fn five_chapter_document_produces_five_top_level_chapters() {
    let blocks = five_chapter_document();
    let snapshot = build(&blocks);
    assert_eq!(snapshot.roots.len(), 5);
    assert_eq!(snapshot.total_sections, 5);
}

#[test]
fn dfs_order_matches_in_document_order_of_title_blocks() {
    let blocks = five_chapter_document();
    let snapshot = build(&blocks);
    let flattened = snapshot.flatten_sections();
    let positions: Vec<usize> = flattened.iter().map(|s| s.start_index).collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted, "DFS order must equal document position order");
}

#[test]
fn every_section_range_is_well_formed_and_children_are_disjoint() {
    let blocks = five_chapter_document();
    let snapshot = build(&blocks);
    for section in all_sections(&snapshot.roots) {
        assert!(section.end_index > section.start_index);
        let mut prev_end = section.start_index;
        for child in &section.children {
            assert!(child.start_index >= prev_end);
            assert!(child.end_index <= section.end_index);
            prev_end = child.end_index;
        }
    }
}

#[test]
fn owned_paragraphs_plus_descendant_owned_paragraphs_cover_the_whole_range() {
    let blocks = five_chapter_document();
    let snapshot = build(&blocks);

    fn collect_owned(node: &SectionNode) -> Vec<String> {
        let mut ids: Vec<String> = node.owned_paragraphs.iter().map(|b| b.as_str().to_string()).collect();
        for child in &node.children {
            ids.extend(collect_owned(child));
        }
        ids
    }

    for section in all_sections(&snapshot.roots) {
        let owned = collect_owned(section);
        let expected: Vec<String> = blocks
            .iter()
            .filter(|b| {
                b.position > section.start_index
                    && b.position < section.end_index
                    && !b.kind.is_heading()
            })
            .map(|b| b.id.as_str().to_string())
            .collect();
        assert_eq!(owned, expected);
    }
}

#[test]
fn every_block_maps_to_exactly_one_paragraph_role() {
    let blocks = five_chapter_document();
    let snapshot = build(&blocks);
    for block in &blocks {
        assert!(snapshot.paragraph_roles.contains_key(&block.id));
    }
    assert_eq!(snapshot.paragraph_roles.len(), blocks.len());
}

#[test]
fn style_inferred_only_document_yields_low_or_medium_global_confidence() {
    let blocks = vec![
        Block::new("h1", BlockKind::Paragraph, "Quarterly Overview", 0)
            .with_style(BlockStyle::new().with_font_size(24.0).with_bold(true)),
        Block::new(
            "p1",
            BlockKind::Paragraph,
            "The quarter saw steady growth across every reporting region we track.",
            1,
        ),
    ];
    let snapshot = build(&blocks);
    assert_ne!(snapshot.global_confidence, docmind_core::Confidence::High);
}
