//! # docmind-intent
//!
//! Extracts a [`ast::CopilotIntent`] from the LLM's tagged
//! `[INTENT]{json}[/INTENT][REPLY]...[/REPLY]` reply. Every parse attempt
//! produces a [`ast::ParsedTurn`] with an explicit [`ast::ParseStatus`];
//! nothing here ever panics on malformed model output.

pub mod ast;
pub mod parser;

pub use ast::{
    CopilotIntent, IntentAction, IntentMode, IntentParams, IntentTarget, ParagraphRef,
    ParseStatus, ParsedTurn, RawIntent, SectionRef, TargetScope,
};
pub use parser::parse_turn;
