//! Intent protocol parsing commands.

use colored::Colorize;
use docmind_intent::{parse_turn, ParseStatus};
use serde::Serialize;

use crate::cli::{IntentCommands, OutputFormat};
use crate::error::CliResult;
use crate::output::read_input;

#[derive(Serialize)]
struct ParsedTurnJson {
    status: String,
    action: Option<String>,
    mode: Option<String>,
    reply_text: String,
}

pub fn handle(cmd: IntentCommands, format: OutputFormat) -> CliResult<()> {
    match cmd {
        IntentCommands::Parse { text } => parse_cmd(text, format),
    }
}

fn parse_cmd(text: Option<String>, format: OutputFormat) -> CliResult<()> {
    let raw = match text {
        Some(text) => text,
        None => read_input(None).map_err(|e| crate::error::CliError::Other(e.to_string()))?,
    };

    let parsed = parse_turn(&raw);

    let status = match &parsed.status {
        ParseStatus::Ok => "ok".to_string(),
        ParseStatus::Missing => "missing".to_string(),
        ParseStatus::JsonError(reason) => format!("json_error: {reason}"),
        ParseStatus::ValidationError(reason) => format!("validation_error: {reason}"),
    };

    match format {
        OutputFormat::Json => {
            let json = ParsedTurnJson {
                status,
                action: parsed.intent.as_ref().map(|i| format!("{:?}", i.action)),
                mode: parsed.intent.as_ref().map(|i| format!("{:?}", i.mode)),
                reply_text: parsed.reply_text.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", "Parsed Turn".cyan().bold());
            match &parsed.status {
                ParseStatus::Ok => println!("{}", "status: ok".green()),
                ParseStatus::Missing => println!("{}", "status: missing (chat-only reply)".blue()),
                ParseStatus::JsonError(reason) => println!("{} {}", "status: json_error".red(), reason),
                ParseStatus::ValidationError(reason) => {
                    println!("{} {}", "status: validation_error".yellow(), reason)
                }
            }
            if let Some(intent) = &parsed.intent {
                println!("action: {:?}, mode: {:?}", intent.action, intent.mode);
            }
            println!("reply: {}", parsed.reply_text);
        }
    }
    Ok(())
}
