//! docmind CLI - command-line surface for the document-intelligence core.
//!
//! Exercises the Structure Engine, Context Envelope Builder, Structural-
//! Query Resolver, Intent Protocol parser, Document Agents, and the Save
//! Coordinator against JSON block fixtures, without requiring a live editor
//! or a real LLM provider.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.trace);

    cli.run().map_err(Into::into)
}

fn init_tracing(verbose: bool, trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
