//! The Copilot Runtime's error taxonomy (spec.md §7): every variant maps to
//! a chat reply the UI surfaces rather than a propagated exception — the
//! runtime itself never panics on a failed turn.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("no document is open")]
    NoDocument,

    #[error("editor is not ready")]
    EditorNotReady,

    #[error("could not locate the requested section")]
    SectionNotFound,

    #[error("llm call failed: {0}")]
    LlmCallFailed(String),

    #[error("could not resolve a concrete edit target")]
    UnresolvableTarget,

    #[error("edit execution failed: {0}")]
    EditExecutionFailed(String),
}

pub type TurnResult<T> = Result<T, TurnError>;
