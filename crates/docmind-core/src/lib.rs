//! # docmind-core
//!
//! Core types for the document-intelligence core of an AI-assisted word
//! processor: blocks, the inferred section tree, the LLM-facing skeleton
//! projection, and paragraph roles.
//!
//! This crate holds data only. The algorithms that derive these types from a
//! raw block sequence live in `docmind-structure`; the algorithms that turn
//! them into LLM context live in `docmind-context`.
//!
//! ## Key Types
//!
//! - [`Block`] / [`UnifiedBlock`] - the editor's atomic content unit
//! - [`SectionNode`] - a node in the inferred section tree
//! - [`DocStructureSnapshot`] - the full structure-analysis result
//! - [`DocSkeleton`] - the LLM-facing projection of the section tree

pub mod block;
pub mod confidence;
pub mod error;
pub mod role;
pub mod section;
pub mod skeleton;
pub mod snapshot;

pub use block::{Alignment, Block, BlockContent, BlockId, BlockKind, BlockStyle, UnifiedBlock};
pub use confidence::Confidence;
pub use error::{DocCoreError, DocCoreResult};
pub use role::ParagraphRole;
pub use section::{HeadingSource, Provenance, SectionId, SectionNode};
pub use skeleton::{DocMeta, LanguageHint, SemanticRole, SkeletonNode};
pub use snapshot::{DocSkeleton, DocStructureSnapshot};
