pub mod agent;
pub mod context;
pub mod intent;
pub mod save;
pub mod structure;

use docmind_context::{EditorMutationFacade, EditorReadFacade, SectionContext, Selection};
use docmind_core::{Block, SectionId};
use docmind_structure::build;

use crate::output::print_info;

/// A read-only façade over a fixed block fixture, used by every command
/// that needs `EditorReadFacade` without a live editor behind it.
pub struct FixtureEditor {
    pub blocks: Vec<Block>,
}

impl FixtureEditor {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

impl EditorReadFacade for FixtureEditor {
    fn read_blocks(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    fn extract_section_context(&self, section_id: &SectionId) -> Option<SectionContext> {
        let snapshot = build(&self.blocks);
        let section = snapshot.flatten_sections().into_iter().find(|s| &s.id == section_id)?;
        Some(SectionContext { blocks: self.blocks[section.start_index..section.end_index].to_vec() })
    }

    fn current_selection(&self) -> Option<Selection> {
        None
    }
}

/// A mutation façade that just prints what would have been applied to the
/// live editor, for commands exercised without one.
#[derive(Default)]
pub struct PrintingMutation;

impl EditorMutationFacade for PrintingMutation {
    fn insert_section_summary(&mut self, section_id: &SectionId, text: &str) -> Result<(), String> {
        print_info(&format!("insert_section_summary({}): {}", section_id.as_str(), text));
        Ok(())
    }

    fn replace_section_body(&mut self, section_id: &SectionId, new_content: &str) -> Result<(), String> {
        print_info(&format!("replace_section_body({}): {}", section_id.as_str(), new_content));
        Ok(())
    }

    fn apply_section_ai_action(
        &mut self,
        action_kind: &str,
        section_id: &SectionId,
        _context: &SectionContext,
    ) -> Result<(), String> {
        print_info(&format!("apply_section_ai_action({}, {})", action_kind, section_id.as_str()));
        Ok(())
    }
}
