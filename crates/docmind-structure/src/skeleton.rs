//! Skeleton projection: maps the section tree to the LLM-facing tree.

use docmind_core::{
    Confidence, DocMeta, LanguageHint, SectionNode, SemanticRole, SkeletonNode,
};
use once_cell::sync::Lazy;
use regex::Regex;

static APPENDIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^appendix\b").unwrap(),
        Regex::new(r"^附录").unwrap(),
    ]
});

static META_TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^(acknowledg|references|bibliography)").unwrap(),
        Regex::new(r"^(致谢|参考文献|版权声明)").unwrap(),
    ]
});

const INTRO_KEYWORDS_EN: &[&str] = &["introduction", "overview", "preface", "foreword"];
const INTRO_KEYWORDS_ZH: &[&str] = &["引言", "绪论", "前言", "概述"];
const CONCLUSION_KEYWORDS_EN: &[&str] = &["conclusion", "summary", "closing remarks"];
const CONCLUSION_KEYWORDS_ZH: &[&str] = &["结论", "总结", "结语"];

fn matches_any(title: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| re.is_match(title))
}

fn matches_keyword(title: &str, keywords: &[&str]) -> bool {
    let lower = title.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

/// `has_parent` is false only for a top-level section (no enclosing
/// section); per the projection rule a level-2 node is a `chapter` when it
/// has no parent and a `section` otherwise.
fn semantic_role(node: &SectionNode, has_parent: bool) -> SemanticRole {
    if matches_any(&node.title, &APPENDIX_PATTERNS) {
        return SemanticRole::Appendix;
    }
    if matches_any(&node.title, &META_TITLE_PATTERNS) {
        return SemanticRole::Meta;
    }
    match node.level {
        1 => SemanticRole::Chapter,
        2 if !has_parent => SemanticRole::Chapter,
        2 => SemanticRole::Section,
        _ => SemanticRole::Subsection,
    }
}

fn chinese_numeral(n: usize) -> String {
    const DIGITS: &[&str] = &["零", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
    if n < 10 {
        return DIGITS[n].to_string();
    }
    if n < 20 {
        return format!("十{}", if n % 10 == 0 { "".into() } else { DIGITS[n % 10].to_string() });
    }
    if n < 100 {
        let tens = n / 10;
        let ones = n % 10;
        let tail = if ones == 0 { String::new() } else { DIGITS[ones].to_string() };
        return format!("{}十{}", DIGITS[tens], tail);
    }
    n.to_string()
}

struct Counters {
    chapter: usize,
}

fn project_node(
    node: &SectionNode,
    parent: Option<&docmind_core::SectionId>,
    counters: &mut Counters,
    child_index: usize,
) -> SkeletonNode {
    let role = semantic_role(node, parent.is_some());

    let display_index = match role {
        SemanticRole::Chapter => {
            counters.chapter += 1;
            format!("第{}章", chinese_numeral(counters.chapter))
        }
        SemanticRole::Section => format!("{}.{}", counters.chapter, child_index + 1),
        SemanticRole::Subsection => (child_index + 1).to_string(),
        SemanticRole::Appendix | SemanticRole::Meta => node.title.clone(),
    };

    let mut child_counters = Counters { chapter: counters.chapter };
    let children: Vec<SkeletonNode> = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| project_node(child, Some(&node.id), &mut child_counters, i))
        .collect();
    counters.chapter = child_counters.chapter;

    SkeletonNode {
        id: node.id.clone(),
        role,
        display_index,
        parent: parent.cloned(),
        title: node.title.clone(),
        paragraph_count: node.owned_paragraphs.len(),
        provenance: node.provenance.clone(),
        children,
    }
}

/// Project a section forest into the LLM-facing skeleton tree.
pub fn project(roots: &[SectionNode]) -> Vec<SkeletonNode> {
    let mut counters = Counters { chapter: 0 };
    roots
        .iter()
        .enumerate()
        .map(|(i, node)| project_node(node, None, &mut counters, i))
        .collect()
}

fn char_ratio(title: &str, predicate: impl Fn(char) -> bool) -> f64 {
    let total = title.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return 0.0;
    }
    let matching = title.chars().filter(|c| predicate(*c)).count();
    matching as f64 / total as f64
}

fn is_chinese_char(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_ascii_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Derive a coarse language hint from the combined title text of a skeleton.
pub fn language_hint(nodes: &[SkeletonNode]) -> LanguageHint {
    let combined: String = nodes
        .iter()
        .flat_map(|n| n.flatten())
        .map(|n| n.title.clone())
        .collect::<Vec<_>>()
        .join(" ");

    let zh_ratio = char_ratio(&combined, is_chinese_char);
    let en_ratio = char_ratio(&combined, is_ascii_letter);

    if zh_ratio >= 0.30 && en_ratio >= 0.30 {
        LanguageHint::Mixed
    } else if zh_ratio >= 0.70 {
        LanguageHint::Zh
    } else if en_ratio >= 0.70 {
        LanguageHint::En
    } else {
        LanguageHint::Other
    }
}

/// Build the aggregated `DocMeta` attached to a skeleton.
pub fn build_meta(nodes: &[SkeletonNode], global_confidence: Confidence, body_font_baseline: f32) -> DocMeta {
    let flat: Vec<&SkeletonNode> = nodes.iter().flat_map(|n| n.flatten()).collect();

    let chapter_count = flat.iter().filter(|n| n.is_chapter()).count();
    let section_count = flat.len();
    let has_intro = flat
        .iter()
        .any(|n| matches_keyword(&n.title, INTRO_KEYWORDS_EN) || matches_keyword(&n.title, INTRO_KEYWORDS_ZH));
    let has_conclusion = flat.iter().any(|n| {
        matches_keyword(&n.title, CONCLUSION_KEYWORDS_EN) || matches_keyword(&n.title, CONCLUSION_KEYWORDS_ZH)
    });

    DocMeta {
        chapter_count,
        section_count,
        has_intro,
        has_conclusion,
        language_hint: language_hint(nodes),
        global_confidence,
        body_font_baseline,
    }
}
