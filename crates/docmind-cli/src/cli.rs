//! CLI definition and command dispatch.

use clap::{Parser, Subcommand};

use crate::commands::{agent, context, intent, save, structure};
use crate::error::CliResult;

/// docmind - command-line surface over the document-intelligence core.
#[derive(Parser)]
#[command(name = "docmind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable trace-level logging.
    #[arg(long, global = true)]
    pub trace: bool,

    /// Output format (text, json).
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Structure Engine operations.
    #[command(subcommand)]
    Structure(StructureCommands),

    /// Context Envelope Builder and Structural-Query Resolver.
    #[command(subcommand)]
    Context(ContextCommands),

    /// Intent protocol parsing.
    #[command(subcommand)]
    Intent(IntentCommands),

    /// Document Agents: the Copilot Runtime and the Agent Runner.
    #[command(subcommand)]
    Agent(AgentCommands),

    /// Save Coordinator and snapshot service.
    #[command(subcommand)]
    Save(SaveCommands),
}

#[derive(Subcommand)]
pub enum StructureCommands {
    /// Run the Structure Engine over a block fixture and print the section
    /// tree (or the raw snapshot JSON with `--format json`).
    Build {
        /// Block fixture path (JSON array of `Block`); reads stdin if absent.
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Project the structure into the LLM-facing skeleton and print it.
    Skeleton {
        #[arg(short, long)]
        input: Option<String>,

        /// Print as a flat table instead of a tree.
        #[arg(long)]
        table: bool,
    },
}

#[derive(Subcommand)]
pub enum ContextCommands {
    /// Build a `DocContextEnvelope` for one turn.
    Envelope {
        #[arg(short, long)]
        input: Option<String>,

        /// document | section (selection is not supported without a live
        /// cursor and is rejected by the builder).
        #[arg(long, default_value = "document")]
        scope: String,

        /// Required when `--scope section`.
        #[arg(long)]
        section_id: Option<String>,

        #[arg(long, default_value = "8000")]
        max_tokens: usize,
    },

    /// Resolve a factual structural question without calling an LLM.
    Query {
        #[arg(short, long)]
        input: Option<String>,

        /// The user's question, e.g. "how many chapters".
        question: String,
    },
}

#[derive(Subcommand)]
pub enum IntentCommands {
    /// Parse a raw LLM reply into a `ParsedTurn`.
    Parse {
        /// The raw `[INTENT]...[/INTENT][REPLY]...[/REPLY]` text; reads
        /// stdin if absent.
        #[arg(short, long)]
        text: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// Run the Copilot Runtime for a single turn against a mocked LLM
    /// reply, printing the resulting outcome.
    Turn {
        #[arg(short, long)]
        input: Option<String>,

        /// The user's utterance.
        utterance: String,

        /// A canned `[INTENT]...[/INTENT][REPLY]...[/REPLY]` reply standing
        /// in for a real LLM call.
        #[arg(long)]
        mock_reply: String,
    },

    /// Run the Document Agent Runner across every section of a document.
    Run {
        #[arg(short, long)]
        input: Option<String>,

        /// summarize | translate
        #[arg(long, default_value = "summarize")]
        kind: String,

        #[arg(long)]
        target_language: Option<String>,

        #[arg(long)]
        style: Option<String>,

        /// Canned LLM replies, one per section in document order. Falls
        /// back to a generic reply for any section beyond the list.
        #[arg(long)]
        mock_reply: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SaveCommands {
    /// Mark a document dirty and wait for the debounced autosave to settle,
    /// printing the final `SaveState`.
    MarkDirty {
        #[arg(long)]
        doc_id: String,

        #[arg(long)]
        content: String,

        #[arg(long)]
        path: String,

        #[arg(long, default_value = "1500")]
        delay_ms: u64,
    },

    /// Write a point-in-time snapshot under `<root>/<docId>/...`.
    Snapshot {
        #[arg(long)]
        doc_id: String,

        #[arg(long)]
        content: String,

        #[arg(long, default_value = "./snapshots")]
        root: String,
    },
}

impl Cli {
    pub fn run(self) -> CliResult<()> {
        match self.command {
            Commands::Structure(cmd) => structure::handle(cmd, self.format),
            Commands::Context(cmd) => context::handle(cmd, self.format),
            Commands::Intent(cmd) => intent::handle(cmd, self.format),
            Commands::Agent(cmd) => agent::handle(cmd, self.format),
            Commands::Save(cmd) => save::handle(cmd, self.format),
        }
    }
}
