//! Envelope-build failures. The builder never panics or propagates these
//! per section; only the two cases below abort the whole build.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("selection scope is not supported in this version")]
    UnsupportedSelectionScope,
    #[error("section scope requires a section identity")]
    MissingSectionId,
    #[error("section {0} was not found in the document")]
    SectionNotFound(String),
}

pub type ContextResult<T> = Result<T, ContextError>;
