//! Core error type.
//!
//! `docmind-core` holds data only, so failures here are limited to
//! malformed identities encountered while deserializing external state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocCoreError {
    #[error("invalid block id: {0}")]
    InvalidBlockId(String),

    #[error("section not found: {0}")]
    SectionNotFound(String),
}

pub type DocCoreResult<T> = Result<T, DocCoreError>;
