//! # docmind-context
//!
//! Builds the per-turn [`envelope::DocContextEnvelope`] handed to the LLM,
//! and resolves factual structural queries without calling it at all.
//!
//! The Envelope Builder and Structural-Query Resolver both read through
//! [`editor::EditorReadFacade`] and a `DocStructureSnapshot`/`DocSkeleton`
//! pair produced by `docmind-structure`; neither owns the document.

pub mod builder;
pub mod editor;
pub mod envelope;
pub mod error;
pub mod query;

pub use builder::{compute_stats, EnvelopeBuilder, FULL_DOC_TOKEN_THRESHOLD};
pub use editor::{EditorMutationFacade, EditorReadFacade, SectionContext, Selection};
pub use envelope::{
    Budget, DocContextEnvelope, DocMetaSummary, Focus, Global, Mode, NeighborSection,
    Neighborhood, Scope, SectionPreview, Stats, Structure,
};
pub use error::{ContextError, ContextResult};
pub use query::{resolve, QueryKind, QueryResolution};
