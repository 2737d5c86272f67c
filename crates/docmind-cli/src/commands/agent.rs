//! Document Agent commands: the Copilot Runtime (single turn) and the
//! Document Agent Runner (whole-document transform).

use colored::Colorize;
use docmind_agent::{collect_section_seeds, AgentRunner, AgentTaskStatus, CopilotRuntime, LlmChatResult, MockLlmTransport, SessionState, TransformKind, TurnOutcome};
use docmind_structure::{build, project};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cli::{AgentCommands, OutputFormat};
use crate::commands::{FixtureEditor, PrintingMutation};
use crate::error::{CliError, CliResult};
use crate::output::{print_output, read_blocks};

pub fn handle(cmd: AgentCommands, format: OutputFormat) -> CliResult<()> {
    match cmd {
        AgentCommands::Turn { input, utterance, mock_reply } => turn_cmd(input, utterance, mock_reply, format),
        AgentCommands::Run { input, kind, target_language, style, mock_reply } => {
            run_cmd(input, kind, target_language, style, mock_reply, format)
        }
    }
}

fn turn_cmd(input: Option<String>, utterance: String, mock_reply: String, format: OutputFormat) -> CliResult<()> {
    let blocks = read_blocks(input).map_err(|e| CliError::Other(e.to_string()))?;
    let snapshot = build(&blocks);
    let skeleton = project(&snapshot);
    let editor = FixtureEditor::new(blocks);

    let transport = Arc::new(MockLlmTransport::reply(mock_reply));
    let runtime = CopilotRuntime::new(transport);

    let mut session = SessionState::new();
    session.open_document("doc-1");
    let mut mutation = PrintingMutation;

    let runtime_result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(e.to_string()))?
        .block_on(runtime.run_turn(&mut session, Some(&editor), &mut mutation, &snapshot, &skeleton, &utterance));

    let outcome = runtime_result.map_err(|e| CliError::Other(e.to_string()))?;

    match format {
        OutputFormat::Json => {
            let json = match &outcome {
                TurnOutcome::Reply(text) => serde_json::json!({ "kind": "reply", "text": text }),
                TurnOutcome::EditApplied { target, action, reply } => serde_json::json!({
                    "kind": "edit_applied",
                    "action": format!("{:?}", action),
                    "target_kind": format!("{:?}", target.kind),
                    "section_id": target.section_id.as_str(),
                    "reply": reply,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", "Copilot Turn".cyan().bold());
            println!("{}", outcome.reply_text());
        }
    }
    Ok(())
}

fn run_cmd(
    input: Option<String>,
    kind: String,
    target_language: Option<String>,
    style: Option<String>,
    mock_reply: Vec<String>,
    format: OutputFormat,
) -> CliResult<()> {
    let blocks = read_blocks(input).map_err(|e| CliError::Other(e.to_string()))?;
    let snapshot = build(&blocks);
    let editor = FixtureEditor::new(blocks);
    let seeds = collect_section_seeds(&snapshot, &editor);

    let kind = match kind.as_str() {
        "summarize" => TransformKind::Summarize,
        "translate" => TransformKind::Translate,
        other => return Err(CliError::InvalidArgument(format!("unknown transform kind '{other}', expected summarize|translate"))),
    };

    let section_count = seeds.len();
    let responses: Vec<LlmChatResult> = (0..section_count)
        .map(|i| LlmChatResult::ok(mock_reply.get(i).cloned().unwrap_or_else(|| "transformed.".to_string())))
        .collect();
    let transport = Arc::new(MockLlmTransport::new(responses));
    let runner = AgentRunner::new(transport);
    let mut mutation = PrintingMutation;
    let cancel = Arc::new(AtomicBool::new(false));

    let state = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(e.to_string()))?
        .block_on(runner.run(seeds, kind, target_language, style, &mut mutation, cancel, |state| {
            if let Some(task) = state.tasks.get(state.current_index) {
                println!("{} {} -> {:?}", "task".dimmed(), task.section_id.as_str(), task.status);
            }
        }));

    print_output(&state, format, |state| {
        println!("{}", "Agent Run".cyan().bold());
        println!("status: {:?}", state.status);
        println!(
            "success: {}, error: {}, skipped: {}",
            state.success_count, state.error_count, state.skipped_count
        );
        for task in &state.tasks {
            if task.status != AgentTaskStatus::Pending {
                println!("  {} [{:?}] {}", task.section_id.as_str(), task.status, task.title);
            }
        }
    });
    Ok(())
}
