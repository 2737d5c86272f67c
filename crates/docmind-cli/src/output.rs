//! Output formatting utilities.

use colored::Colorize;
use docmind_core::{DocSkeleton, SkeletonNode};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;

/// Print a serializable value as JSON, or via a caller-supplied text
/// formatter.
pub fn print_output<T: Serialize>(value: &T, format: OutputFormat, text_fn: impl FnOnce(&T)) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{json}");
            }
        }
        OutputFormat::Text => text_fn(value),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "\u{2713}".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "\u{2717}".red().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "\u{2139}".blue().bold(), message);
}

#[derive(Tabled, Serialize)]
pub struct SectionRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Paragraphs")]
    pub paragraphs: String,
}

impl SectionRow {
    fn from_node(node: &SkeletonNode) -> Self {
        Self {
            id: node.id.as_str().to_string(),
            level: node.display_index.clone(),
            role: format!("{:?}", node.role),
            title: node.title.clone(),
            paragraphs: node.paragraph_count.to_string(),
        }
    }
}

/// Print the skeleton as a flat table, one row per section in traversal
/// order.
pub fn print_skeleton_table(skeleton: &DocSkeleton) {
    let rows: Vec<SectionRow> = skeleton.flatten().into_iter().map(SectionRow::from_node).collect();
    println!("{}", tabled::Table::new(&rows));
}

/// Print the skeleton as an indented tree.
pub fn print_skeleton_tree(skeleton: &DocSkeleton) {
    fn walk(node: &SkeletonNode, depth: usize) {
        let indent = "  ".repeat(depth);
        println!(
            "{indent}{} {} {}",
            node.display_index.cyan(),
            format!("[{:?}]", node.role).dimmed(),
            node.title
        );
        for child in &node.children {
            walk(child, depth + 1);
        }
    }

    println!("{}", "Document Skeleton".cyan().bold());
    for root in &skeleton.roots {
        walk(root, 0);
    }
    println!(
        "{} {} chapters, {} sections, confidence {:?}",
        "Summary:".dimmed(),
        skeleton.meta.chapter_count,
        skeleton.meta.section_count,
        skeleton.meta.global_confidence
    );
}

/// Read a block fixture (a JSON array of `docmind_core::Block`) from a file
/// path, or from stdin if no path is given.
pub fn read_blocks(input: Option<String>) -> anyhow::Result<Vec<docmind_core::Block>> {
    let json = read_input(input)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn read_input(input: Option<String>) -> anyhow::Result<String> {
    use std::io::Read;
    if let Some(path) = input {
        Ok(std::fs::read_to_string(path)?)
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

pub fn write_output(content: &str, output: Option<String>) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(&path, content)?;
        print_success(&format!("written to {path}"));
    } else {
        println!("{content}");
    }
    Ok(())
}
