//! # docmind-structure
//!
//! The Structure Engine: turns a raw, ordered block sequence into an
//! inferred section tree and its LLM-facing skeleton projection.
//!
//! Pipeline: `extract_features` -> `score_headings` -> `assign_levels` ->
//! `build_tree` -> `tag_roles` -> `compute_confidence` -> `project_skeleton`,
//! composed by [`build`] and [`project`]. Each stage lives in its own module
//! and is unit tested independently; [`build`] and [`project`] are covered
//! end to end in `tests/`.

pub mod confidence;
pub mod engine;
pub mod features;
pub mod level;
pub mod roles;
pub mod scoring;
pub mod skeleton;
pub mod tree;

pub use engine::{build, project};
pub use features::BlockFeatures;
pub use scoring::HeadingCandidate;
