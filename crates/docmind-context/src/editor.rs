//! Read-only traversal and mutation façades the host editor implements.
//!
//! These traits are the seam between this crate and the live editor: the
//! Envelope Builder and Structural-Query Resolver only ever see documents
//! through [`EditorReadFacade`], and the Copilot Runtime only ever mutates
//! through [`EditorMutationFacade`]. Neither trait assumes anything about
//! how the editor stores blocks.

use docmind_core::{Block, BlockId, SectionId};

/// A section's block subtree, as handed back by the editor.
#[derive(Debug, Clone)]
pub struct SectionContext {
    pub blocks: Vec<Block>,
}

/// The editor's current cursor selection, if any.
#[derive(Debug, Clone)]
pub struct Selection {
    pub block_id: BlockId,
}

/// Read-only access to the live document, consumed by the Structure Engine
/// and Envelope Builder.
pub trait EditorReadFacade {
    /// An ordered snapshot of top-level blocks.
    fn read_blocks(&self) -> Vec<Block>;

    /// The block subtree owned by a section, or `None` if the section is
    /// unknown to the editor.
    fn extract_section_context(&self, section_id: &SectionId) -> Option<SectionContext>;

    /// Concatenated plain text of a section's block subtree.
    fn section_full_text(&self, context: &SectionContext) -> String {
        context
            .blocks
            .iter()
            .map(|b| b.content.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The editor's current cursor selection, if any.
    fn current_selection(&self) -> Option<Selection>;
}

/// Mutating operations the Copilot Runtime performs against the live
/// document. Each call targets a section; the editor is responsible for
/// translating that into its own in-place edits.
pub trait EditorMutationFacade {
    /// Append a "本节总结" paragraph at the section's end.
    fn insert_section_summary(&mut self, section_id: &SectionId, text: &str) -> Result<(), String>;

    /// Replace a section's body wholesale, used by translation actions.
    fn replace_section_body(&mut self, section_id: &SectionId, new_content: &str) -> Result<(), String>;

    /// The unified entry point for section-level rewrite/summarize/expand.
    fn apply_section_ai_action(
        &mut self,
        action_kind: &str,
        section_id: &SectionId,
        context: &SectionContext,
    ) -> Result<(), String>;
}
