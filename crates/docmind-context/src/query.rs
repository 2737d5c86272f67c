//! The Structural-Query Resolver: answers factual questions about document
//! structure and statistics without consulting the LLM.

use crate::envelope::{Global, Stats};
use docmind_core::Confidence;
use once_cell::sync::Lazy;
use regex::Regex;

static STRONG_EDIT_KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"重写|改写|修改|润色|精简|扩展|删除|添加|替换").unwrap(),
        Regex::new(r"(?i)\b(rewrite|edit|polish|expand|shorten|improve|delete|add|update|replace)\b")
            .unwrap(),
    ]
});

static WEAK_EDIT_KEYWORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"帮我|请|把|将|让|使|能不能|可以").unwrap(),
        Regex::new(r"(?i)\b(please|can you|help me)\b").unwrap(),
    ]
});

static CHAPTER_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"几章|多少章").unwrap(),
        Regex::new(r"(?i)how many chapters").unwrap(),
    ]
});

static SECTION_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"几(节|段)|多少(节|段)").unwrap(),
        Regex::new(r"(?i)how many sections").unwrap(),
    ]
});

static PARAGRAPH_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"几段落|多少段落").unwrap(),
        Regex::new(r"(?i)how many paragraphs").unwrap(),
    ]
});

static WORD_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"多少字|字数").unwrap(),
        Regex::new(r"(?i)how many words|word count").unwrap(),
    ]
});

static CHAR_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"多少字符|字符数").unwrap(),
        Regex::new(r"(?i)how many characters|character count").unwrap(),
    ]
});

static TOKEN_COUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"(?i)how many tokens|token count|多少(令牌|token)").unwrap()]
});

static TITLE_QUERY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"标题是什么|题目是什么").unwrap(),
        Regex::new(r"(?i)what('s| is) the title").unwrap(),
    ]
});

static CHAPTER_LOCATOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"第([0-9一二三四五六七八九十]+)(章|节|段)").unwrap());

/// The kind of structural query recognized, or `other` when no pattern
/// matched (or a strong edit keyword was present, forcing LLM handling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    ChapterCount,
    SectionCount,
    ParagraphCount,
    WordCount,
    CharCount,
    TokenCount,
    Title,
    ChapterLocator,
    Other,
}

/// The resolver's answer for one query.
#[derive(Debug, Clone)]
pub struct QueryResolution {
    pub kind: QueryKind,
    pub direct_answer: Option<String>,
    pub clarification_question: Option<String>,
    pub confidence: Confidence,
    pub short_circuit: bool,
}

impl QueryResolution {
    fn other() -> Self {
        Self {
            kind: QueryKind::Other,
            direct_answer: None,
            clarification_question: None,
            confidence: Confidence::Low,
            short_circuit: false,
        }
    }
}

fn matches_any(query: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| re.is_match(query))
}

fn has_strong_edit_keyword(query: &str) -> bool {
    matches_any(query, &STRONG_EDIT_KEYWORDS)
}

fn has_weak_edit_keyword(query: &str) -> bool {
    matches_any(query, &WEAK_EDIT_KEYWORDS)
}

fn chinese_numeral_to_usize(s: &str) -> Option<usize> {
    if let Ok(n) = s.parse::<usize>() {
        return Some(n);
    }
    const DIGITS: &[(char, usize)] = &[
        ('零', 0), ('一', 1), ('二', 2), ('三', 3), ('四', 4),
        ('五', 5), ('六', 6), ('七', 7), ('八', 8), ('九', 9),
    ];
    let digit = |c: char| DIGITS.iter().find(|(ch, _)| *ch == c).map(|(_, v)| *v);

    if s == "十" {
        return Some(10);
    }
    if let Some(rest) = s.strip_prefix('十') {
        return digit(rest.chars().next()?).map(|d| 10 + d);
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() == 3 && chars[1] == '十' {
        let tens = digit(chars[0])?;
        let ones = digit(chars[2])?;
        return Some(tens * 10 + ones);
    }
    if chars.len() == 2 && chars[1] == '十' {
        let tens = digit(chars[0])?;
        return Some(tens * 10);
    }
    digit(chars.first().copied()?)
}

/// Resolve one structural query against the document's global context.
///
/// `title_confidence` grades how certain the extracted document title is
/// (distinct from `global.skeleton`'s own `global_confidence`, since a title
/// can be ambiguous even in an otherwise well-structured document).
pub fn resolve(query: &str, global: &Global, title_confidence: Confidence) -> QueryResolution {
    if has_strong_edit_keyword(query) {
        return QueryResolution::other();
    }

    let weak_edit = has_weak_edit_keyword(query);
    let global_confidence = global.skeleton.meta.global_confidence;

    let mut resolution = if matches_any(query, &CHAPTER_COUNT_PATTERNS) {
        count_resolution(QueryKind::ChapterCount, global.skeleton.meta.chapter_count)
    } else if matches_any(query, &SECTION_COUNT_PATTERNS) {
        count_resolution(QueryKind::SectionCount, global.skeleton.meta.section_count)
    } else if matches_any(query, &PARAGRAPH_COUNT_PATTERNS) {
        stats_count_resolution(QueryKind::ParagraphCount, &global.stats, |s| s.paragraph_count)
    } else if matches_any(query, &WORD_COUNT_PATTERNS) {
        stats_count_resolution(QueryKind::WordCount, &global.stats, |s| s.word_count)
    } else if matches_any(query, &CHAR_COUNT_PATTERNS) {
        stats_count_resolution(QueryKind::CharCount, &global.stats, |s| s.char_count)
    } else if matches_any(query, &TOKEN_COUNT_PATTERNS) {
        stats_count_resolution(QueryKind::TokenCount, &global.stats, |s| s.token_estimate)
    } else if matches_any(query, &TITLE_QUERY_PATTERNS) {
        title_resolution(global, title_confidence)
    } else if let Some(captures) = CHAPTER_LOCATOR_PATTERN.captures(query) {
        chapter_locator_resolution(global, &captures[1])
    } else {
        QueryResolution::other()
    };

    if resolution.kind == QueryKind::Other {
        return resolution;
    }

    if weak_edit {
        resolution.short_circuit = false;
    }

    let is_count_query = matches!(
        resolution.kind,
        QueryKind::ChapterCount
            | QueryKind::SectionCount
            | QueryKind::ParagraphCount
            | QueryKind::WordCount
            | QueryKind::CharCount
            | QueryKind::TokenCount
    );

    if global_confidence == Confidence::Low && is_count_query && is_style_inferred_only(global) {
        // Counts derived entirely from inferred styling (no heading markers
        // anywhere) carry too much uncertainty in the boundaries themselves
        // to state a number with confidence, unlike a plain low-confidence
        // rollup where the sections exist but their levels are uncertain.
        resolution.direct_answer = None;
        resolution.confidence = Confidence::Low;
        resolution.clarification_question = Some(
            "文档结构完全基于样式推断（未检测到显式标题标记），无法确定准确数量。".to_string(),
        );
    } else if global_confidence == Confidence::Low && resolution.confidence == Confidence::High {
        resolution.confidence = Confidence::Medium;
        if let Some(answer) = &mut resolution.direct_answer {
            answer.push_str("（结构判定置信度较低，此结果仅供参考）");
        }
    }

    resolution
}

/// True when every section in the skeleton was detected purely from visual
/// styling, with no editor heading marker anywhere in the document.
fn is_style_inferred_only(global: &Global) -> bool {
    let nodes = global.skeleton.flatten();
    !nodes.is_empty()
        && nodes
            .iter()
            .all(|n| n.provenance.source == docmind_core::HeadingSource::StyleInferred)
}

fn count_resolution(kind: QueryKind, count: usize) -> QueryResolution {
    QueryResolution {
        kind,
        direct_answer: Some(count.to_string()),
        clarification_question: None,
        confidence: Confidence::High,
        short_circuit: true,
    }
}

fn stats_count_resolution(kind: QueryKind, stats: &Stats, extract: impl Fn(&Stats) -> usize) -> QueryResolution {
    QueryResolution {
        kind,
        direct_answer: Some(extract(stats).to_string()),
        clarification_question: None,
        confidence: Confidence::High,
        short_circuit: true,
    }
}

fn title_resolution(global: &Global, title_confidence: Confidence) -> QueryResolution {
    if title_confidence == Confidence::Low {
        let alternates: Vec<String> = global
            .outline
            .iter()
            .take(3)
            .map(|p| p.title.clone())
            .collect();
        return QueryResolution {
            kind: QueryKind::Title,
            direct_answer: None,
            clarification_question: Some(format!(
                "文档标题不确定，可能是以下之一：{}",
                alternates.join("、")
            )),
            confidence: Confidence::Low,
            short_circuit: true,
        };
    }

    QueryResolution {
        kind: QueryKind::Title,
        direct_answer: Some(global.doc_meta.title.clone()),
        clarification_question: None,
        confidence: Confidence::High,
        short_circuit: true,
    }
}

fn chapter_locator_resolution(global: &Global, ordinal: &str) -> QueryResolution {
    let Some(index) = chinese_numeral_to_usize(ordinal) else {
        return QueryResolution::other();
    };

    let chapters = &global.structure.chapters;
    if index == 0 || index > chapters.len() {
        return QueryResolution {
            kind: QueryKind::ChapterLocator,
            direct_answer: None,
            clarification_question: Some(format!(
                "文档只有 {} 章，没有第 {} 章。",
                chapters.len(),
                index
            )),
            confidence: Confidence::Low,
            short_circuit: true,
        };
    }

    let chapter = &chapters[index - 1];
    QueryResolution {
        kind: QueryKind::ChapterLocator,
        direct_answer: Some(chapter.title.clone()),
        clarification_question: None,
        confidence: Confidence::High,
        short_circuit: true,
    }
}
