//! Extracts and validates the `[INTENT]{json}[/INTENT][REPLY]...[/REPLY]`
//! pair from raw LLM output.

use crate::ast::{
    CopilotIntent, IntentTarget, ParseStatus, ParsedTurn, RawIntent, TargetScope,
};
use once_cell::sync::Lazy;
use regex::Regex;

static INTENT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[INTENT\]\s*(.*?)\s*\[/INTENT\]").unwrap());

static REPLY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\[REPLY\]\s*(.*?)\s*\[/REPLY\]").unwrap());

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").unwrap());

fn strip_code_fence(body: &str) -> &str {
    match CODE_FENCE.captures(body.trim()) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(body),
        None => body.trim(),
    }
}

/// Locate the `[REPLY]` block; falls back to the raw text with the
/// `[INTENT]` block stripped out when no `[REPLY]` tag is present.
fn extract_reply(raw: &str) -> String {
    if let Some(caps) = REPLY_BLOCK.captures(raw) {
        return caps[1].trim().to_string();
    }
    INTENT_BLOCK.replace(raw, "").trim().to_string()
}

fn validate(raw: RawIntent) -> Result<CopilotIntent, String> {
    let RawIntent { mode, action, target, params } = raw;

    if target.scope == TargetScope::Section && target.section_id.is_none() {
        return Err("target.sectionId is required for section-scoped actions".to_string());
    }

    Ok(CopilotIntent {
        mode,
        action,
        target: IntentTarget {
            scope: target.scope,
            section_id: target.section_id,
        },
        params,
    })
}

/// Parse one turn of raw LLM output into a `[INTENT]`/`[REPLY]` pair.
///
/// `status` is `Ok` only when an `[INTENT]` block was found, its JSON body
/// parsed, and it passed validation; every other outcome still returns a
/// usable `reply_text` so the turn can proceed as a plain chat reply.
pub fn parse_turn(raw: &str) -> ParsedTurn {
    let reply_text = extract_reply(raw);

    let Some(caps) = INTENT_BLOCK.captures(raw) else {
        return ParsedTurn {
            status: ParseStatus::Missing,
            intent: None,
            reply_text,
        };
    };

    let body = strip_code_fence(&caps[1]);

    let raw_intent: RawIntent = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return ParsedTurn {
                status: ParseStatus::JsonError(err.to_string()),
                intent: None,
                reply_text,
            };
        }
    };

    match validate(raw_intent) {
        Ok(intent) => ParsedTurn {
            status: ParseStatus::Ok,
            intent: Some(intent),
            reply_text,
        },
        Err(message) => ParsedTurn {
            status: ParseStatus::ValidationError(message),
            intent: None,
            reply_text,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IntentAction, IntentMode, SectionRef};

    #[test]
    fn well_formed_turn_parses_to_ok() {
        let raw = r#"[INTENT]{"mode":"edit","action":"rewrite_section","target":{"scope":"section","sectionId":"current"}}[/INTENT]
[REPLY]I'll tighten up that section for you.[/REPLY]"#;
        let turn = parse_turn(raw);
        assert_eq!(turn.status, ParseStatus::Ok);
        let intent = turn.intent.unwrap();
        assert_eq!(intent.mode, IntentMode::Edit);
        assert_eq!(intent.action, IntentAction::RewriteSection);
        assert_eq!(intent.target.section_id, Some(SectionRef::Current));
        assert_eq!(turn.reply_text, "I'll tighten up that section for you.");
    }

    #[test]
    fn tag_matching_is_case_insensitive() {
        let raw = "[intent]{\"mode\":\"chat\",\"action\":\"highlight_terms\",\"target\":{\"scope\":\"document\"}}[/intent]\n[reply]done[/reply]";
        let turn = parse_turn(raw);
        assert_eq!(turn.status, ParseStatus::Ok);
    }

    #[test]
    fn missing_intent_block_falls_back_to_raw_text_as_reply() {
        let raw = "Sure, here's a summary of the chapter without any tags.";
        let turn = parse_turn(raw);
        assert_eq!(turn.status, ParseStatus::Missing);
        assert!(turn.intent.is_none());
        assert_eq!(turn.reply_text, raw);
    }

    #[test]
    fn malformed_json_yields_json_error_with_fallback_reply() {
        let raw = "[INTENT]{not valid json[/INTENT]\n[REPLY]here you go[/REPLY]";
        let turn = parse_turn(raw);
        assert!(matches!(turn.status, ParseStatus::JsonError(_)));
        assert_eq!(turn.reply_text, "here you go");
    }

    #[test]
    fn section_scope_without_section_id_fails_validation() {
        let raw = r#"[INTENT]{"mode":"edit","action":"summarize_section","target":{"scope":"section"}}[/INTENT][REPLY]ok[/REPLY]"#;
        let turn = parse_turn(raw);
        assert!(matches!(turn.status, ParseStatus::ValidationError(_)));
    }

    #[test]
    fn code_fenced_json_body_is_unwrapped() {
        let raw = "[INTENT]\n```json\n{\"mode\":\"chat\",\"action\":\"summarize_document\",\"target\":{\"scope\":\"document\"}}\n```\n[/INTENT]\n[REPLY]summary below[/REPLY]";
        let turn = parse_turn(raw);
        assert_eq!(turn.status, ParseStatus::Ok);
    }

    #[test]
    fn nth_paragraph_ref_round_trips_with_index() {
        let raw = r#"[INTENT]{"mode":"edit","action":"rewrite_paragraph","target":{"scope":"section","sectionId":"sec-1"},"params":{"paragraphRef":"nth","paragraphIndex":3}}[/INTENT][REPLY]ok[/REPLY]"#;
        let turn = parse_turn(raw);
        let intent = turn.intent.expect("should parse");
        assert_eq!(intent.params.paragraph_index, Some(3));
        assert_eq!(intent.target.section_id, Some(SectionRef::Id("sec-1".to_string())));
    }
}
