//! Context Envelope Builder and Structural-Query Resolver commands.

use colored::Colorize;
use docmind_context::{compute_stats, resolve, EnvelopeBuilder, Scope};
use docmind_core::{Confidence, SectionId};
use docmind_structure::{build, project};

use crate::cli::{ContextCommands, OutputFormat};
use crate::commands::FixtureEditor;
use crate::error::{CliError, CliResult};
use crate::output::{print_output, read_blocks};

pub fn handle(cmd: ContextCommands, format: OutputFormat) -> CliResult<()> {
    match cmd {
        ContextCommands::Envelope { input, scope, section_id, max_tokens } => {
            envelope_cmd(input, scope, section_id, max_tokens, format)
        }
        ContextCommands::Query { input, question } => query_cmd(input, question, format),
    }
}

fn parse_scope(scope: &str) -> CliResult<Scope> {
    match scope {
        "document" => Ok(Scope::Document),
        "section" => Ok(Scope::Section),
        "selection" => Ok(Scope::Selection),
        other => Err(CliError::InvalidArgument(format!("unknown scope '{other}', expected document|section|selection"))),
    }
}

fn envelope_cmd(
    input: Option<String>,
    scope: String,
    section_id: Option<String>,
    max_tokens: usize,
    format: OutputFormat,
) -> CliResult<()> {
    let blocks = read_blocks(input).map_err(|e| CliError::Other(e.to_string()))?;
    let editor = FixtureEditor::new(blocks);
    let snapshot = build(&editor.blocks);
    let skeleton = project(&snapshot);
    let scope = parse_scope(&scope)?;
    let section_id = section_id.map(SectionId);

    let builder = EnvelopeBuilder::new(&editor, &snapshot, &skeleton, "doc-1", max_tokens);
    let envelope = builder.build(scope, section_id.as_ref())?;

    print_output(&envelope, format, |envelope| {
        println!("{}", "Context Envelope".cyan().bold());
        println!("scope: {:?}, mode: {:?}", envelope.scope, envelope.mode);
        println!("budget: {}/{} tokens", envelope.budget.estimated_tokens, envelope.budget.max_tokens);
        if let Some(focus) = &envelope.focus {
            println!("focus: {} ({} chars)", focus.title, focus.char_count);
        }
        println!(
            "global: \"{}\", {} chapters, {} sections",
            envelope.global.title,
            envelope.global.structure.chapters.len(),
            envelope.global.structure.sections.len()
        );
    });
    Ok(())
}

fn query_cmd(input: Option<String>, question: String, format: OutputFormat) -> CliResult<()> {
    let blocks = read_blocks(input).map_err(|e| CliError::Other(e.to_string()))?;
    let snapshot = build(&blocks);
    let skeleton = project(&snapshot);

    let full_text = blocks.iter().map(|b| b.content.text.as_str()).collect::<Vec<_>>().join("\n\n");
    let stats = compute_stats(&full_text);

    let outline = skeleton.flatten().iter().map(|n| docmind_context::SectionPreview {
        section_id: n.id.clone(),
        title: n.title.clone(),
        level: section_level(n.role),
        char_count: 0,
        snippet: String::new(),
    }).collect::<Vec<_>>();

    let global = docmind_context::Global {
        title: skeleton.roots.first().map(|n| n.title.clone()).unwrap_or_default(),
        outline: outline.clone(),
        previews: outline.clone(),
        structure: docmind_context::Structure {
            chapters: outline.iter().filter(|p| p.level == 1).cloned().collect(),
            sections: outline,
        },
        stats,
        doc_meta: docmind_context::DocMetaSummary {
            title: skeleton.roots.first().map(|n| n.title.clone()).unwrap_or_default(),
            has_explicit_title: snapshot.doc_title_block.is_some(),
        },
        skeleton: skeleton.clone(),
    };

    let title_confidence = if snapshot.doc_title_block.is_some() { Confidence::High } else { Confidence::Low };
    let resolution = resolve(&question, &global, title_confidence);

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "kind": format!("{:?}", resolution.kind),
                "confidence": format!("{:?}", resolution.confidence),
                "direct_answer": resolution.direct_answer,
                "clarification_question": resolution.clarification_question,
                "short_circuit": resolution.short_circuit,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", "Query Resolution".cyan().bold());
            println!("kind: {:?}, confidence: {:?}", resolution.kind, resolution.confidence);
            if let Some(answer) = &resolution.direct_answer {
                println!("answer: {answer}");
            }
            if let Some(question) = &resolution.clarification_question {
                println!("clarification needed: {question}");
            }
            if !resolution.short_circuit {
                println!("{}", "(not resolvable without the LLM)".dimmed());
            }
        }
    }
    Ok(())
}

fn section_level(role: docmind_core::SemanticRole) -> u8 {
    match role {
        docmind_core::SemanticRole::Chapter => 1,
        docmind_core::SemanticRole::Section => 2,
        docmind_core::SemanticRole::Subsection => 3,
        docmind_core::SemanticRole::Appendix | docmind_core::SemanticRole::Meta => 1,
    }
}
