//! Builds a `DocContextEnvelope` for one turn, parameterised by scope.

use crate::editor::EditorReadFacade;
use crate::envelope::{
    estimate_tokens, Budget, DocContextEnvelope, DocMetaSummary, Focus, Global, Mode, Neighborhood,
    Scope, SectionPreview, Stats, Structure,
};
use crate::error::{ContextError, ContextResult};
use docmind_core::{DocSkeleton, DocStructureSnapshot, SectionId, SectionNode, SemanticRole};
use tracing::debug;

/// Full document text becomes `chunked` instead of `full` once the estimated
/// token count reaches this threshold.
pub const FULL_DOC_TOKEN_THRESHOLD: usize = 8_000;

pub struct EnvelopeBuilder<'a> {
    facade: &'a dyn EditorReadFacade,
    snapshot: &'a DocStructureSnapshot,
    skeleton: &'a DocSkeleton,
    document_id: String,
    max_tokens: usize,
}

impl<'a> EnvelopeBuilder<'a> {
    pub fn new(
        facade: &'a dyn EditorReadFacade,
        snapshot: &'a DocStructureSnapshot,
        skeleton: &'a DocSkeleton,
        document_id: impl Into<String>,
        max_tokens: usize,
    ) -> Self {
        Self {
            facade,
            snapshot,
            skeleton,
            document_id: document_id.into(),
            max_tokens,
        }
    }

    /// Build the envelope for the requested scope.
    pub fn build(&self, scope: Scope, section_id: Option<&SectionId>) -> ContextResult<DocContextEnvelope> {
        match scope {
            Scope::Selection => Err(ContextError::UnsupportedSelectionScope),
            Scope::Section => {
                let section_id = section_id.ok_or(ContextError::MissingSectionId)?;
                self.build_section_scope(section_id)
            }
            Scope::Document => self.build_document_scope(),
        }
    }

    fn find_section(&self, section_id: &SectionId) -> Option<&SectionNode> {
        self.snapshot
            .flatten_sections()
            .into_iter()
            .find(|s| &s.id == section_id)
    }

    fn section_text(&self, section: &SectionNode) -> String {
        match self.facade.extract_section_context(&section.id) {
            Some(context) => self.facade.section_full_text(&context),
            None => String::new(),
        }
    }

    fn build_section_scope(&self, section_id: &SectionId) -> ContextResult<DocContextEnvelope> {
        let section = self
            .find_section(section_id)
            .ok_or_else(|| ContextError::SectionNotFound(section_id.as_str().to_string()))?;

        let text = self.section_text(section);
        let char_count = text.chars().count();
        let token_estimate = estimate_tokens(char_count);

        let focus = Focus {
            section_id: section.id.clone(),
            title: section.title.clone(),
            text,
            char_count,
            token_estimate,
        };

        debug!(section = section_id.as_str(), char_count, "context.build: section scope");

        Ok(DocContextEnvelope {
            document_id: self.document_id.clone(),
            scope: Scope::Section,
            focus: Some(focus),
            neighborhood: Neighborhood::default(),
            global: self.build_global(),
            budget: Budget {
                max_tokens: self.max_tokens,
                estimated_tokens: token_estimate,
            },
            mode: None,
            document_full_text: None,
            global_confidence: self.snapshot.global_confidence,
        })
    }

    fn build_document_scope(&self) -> ContextResult<DocContextEnvelope> {
        let sections = self.snapshot.flatten_sections();
        let texts: Vec<(&SectionNode, String)> =
            sections.iter().map(|s| (*s, self.section_text(s))).collect();

        let full_text = texts
            .iter()
            .map(|(_, t)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let char_count = full_text.chars().count();
        let token_estimate = estimate_tokens(char_count);

        let mode = if token_estimate < FULL_DOC_TOKEN_THRESHOLD {
            Mode::Full
        } else {
            Mode::Chunked
        };

        let document_full_text = match mode {
            Mode::Full if !full_text.is_empty() => Some(full_text.clone()),
            _ => None,
        };

        debug!(token_estimate, mode = ?mode, "context.build: document scope");

        Ok(DocContextEnvelope {
            document_id: self.document_id.clone(),
            scope: Scope::Document,
            focus: None,
            neighborhood: Neighborhood::default(),
            global: self.build_global(),
            budget: Budget {
                max_tokens: self.max_tokens,
                estimated_tokens: token_estimate,
            },
            mode: Some(mode),
            document_full_text,
            global_confidence: self.snapshot.global_confidence,
        })
    }

    fn build_global(&self) -> Global {
        let sections = self.snapshot.flatten_sections();
        let skeleton_flat = self.skeleton.flatten();

        let section_texts: Vec<String> = sections.iter().map(|s| self.section_text(s)).collect();

        let previews: Vec<SectionPreview> = sections
            .iter()
            .zip(section_texts.iter())
            .map(|(s, text)| SectionPreview {
                section_id: s.id.clone(),
                title: s.title.clone(),
                level: s.level,
                char_count: text.chars().count(),
                snippet: SectionPreview::snippet_of(text),
            })
            .collect();

        let chapters: Vec<SectionPreview> = sections
            .iter()
            .zip(skeleton_flat.iter())
            .zip(previews.iter())
            .filter(|((s, sk), _)| s.level == 1 || sk.role == SemanticRole::Chapter)
            .map(|((_, _), preview)| preview.clone())
            .collect();

        let full_text = section_texts.join("\n\n");
        let stats = compute_stats(&full_text);

        let title = sections.first().map(|s| s.title.clone()).unwrap_or_default();
        let top_level_chapter_count = self
            .skeleton
            .roots
            .iter()
            .filter(|n| n.role == SemanticRole::Chapter)
            .count();
        let has_explicit_title = top_level_chapter_count == 1;

        Global {
            title: title.clone(),
            outline: previews.clone(),
            structure: Structure {
                chapters,
                sections: previews.clone(),
            },
            previews,
            stats,
            doc_meta: DocMetaSummary { title, has_explicit_title },
            skeleton: self.skeleton.clone(),
        }
    }
}

/// Character/word/token/paragraph counts for a block of text.
pub fn compute_stats(text: &str) -> Stats {
    let char_count = text.chars().count();
    let word_count = count_words(text);
    let token_estimate = estimate_tokens(char_count);
    let paragraph_count = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .count();

    Stats {
        char_count,
        word_count,
        token_estimate,
        paragraph_count,
    }
}

fn is_chinese_char(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Chinese characters count one word each; English text is counted by
/// whitespace-separated tokens.
fn count_words(text: &str) -> usize {
    let chinese_count = text.chars().filter(|c| is_chinese_char(*c)).count();
    let english_word_count = text
        .split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_ascii_alphanumeric()))
        .count();
    chinese_count + english_word_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_combines_chinese_chars_and_english_tokens() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("你好世界"), 4);
        assert_eq!(count_words("hello 世界"), 3);
    }

    #[test]
    fn paragraph_count_splits_on_blank_lines_and_discards_empties() {
        let text = "first\n\nsecond\n\n\n\nthird";
        let stats = compute_stats(text);
        assert_eq!(stats.paragraph_count, 3);
    }

    #[test]
    fn token_estimate_is_chars_divided_by_four_rounded_up() {
        let stats = compute_stats("abcde");
        assert_eq!(stats.token_estimate, 2);
    }
}
