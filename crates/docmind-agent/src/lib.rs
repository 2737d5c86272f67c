//! # docmind-agent
//!
//! Document Agents (spec.md §4.5, §4.6): the Copilot Runtime, which
//! orchestrates one conversational turn end to end, and the Document Agent
//! Runner, which applies a per-section transformation across a whole
//! document with deterministic, cancellable progress.
//!
//! Both consume the read/write façades defined in `docmind-context`, the
//! parsed intents from `docmind-intent`, and an [`llm::LlmTransport`]
//! trait object — nothing here assumes a concrete editor or LLM provider.

pub mod error;
pub mod llm;
pub mod runner;
pub mod runtime;
pub mod task;

pub use error::{TurnError, TurnResult};
pub use llm::{HttpLlmTransport, LlmChatResult, LlmMessage, LlmRole, LlmTransport, MockLlmTransport};
pub use runner::{collect_section_seeds, AgentRunner, SectionSeed, TransformKind, DEFAULT_MIN_SECTION_CHARS};
pub use runtime::{CopilotRuntime, ResolvedEditTarget, ResolvedKind, SessionState, TurnOutcome, UserPreferences};
pub use task::{AgentOverallStatus, AgentState, AgentTask, AgentTaskStatus};
