//! Structure Engine commands.

use colored::Colorize;
use docmind_core::SectionNode;
use docmind_structure::{build, project};

use crate::cli::{OutputFormat, StructureCommands};
use crate::error::CliResult;
use crate::output::{print_output, print_skeleton_table, print_skeleton_tree, read_blocks};

pub fn handle(cmd: StructureCommands, format: OutputFormat) -> CliResult<()> {
    match cmd {
        StructureCommands::Build { input } => build_cmd(input, format),
        StructureCommands::Skeleton { input, table } => skeleton_cmd(input, table, format),
    }
}

fn build_cmd(input: Option<String>, format: OutputFormat) -> CliResult<()> {
    let blocks = read_blocks(input)?;
    let snapshot = build(&blocks);

    print_output(&snapshot, format, |snapshot| {
        println!("{}", "Document Structure".cyan().bold());
        println!(
            "{} sections, {} blocks, confidence {:?}",
            snapshot.total_sections, snapshot.total_blocks, snapshot.global_confidence
        );
        for root in &snapshot.roots {
            print_section(root, 0);
        }
    });
    Ok(())
}

fn print_section(node: &SectionNode, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}{} {} ({:?}, {:?})",
        format!("L{}", node.level).yellow(),
        node.title,
        node.provenance.source,
        node.provenance.confidence
    );
    for child in &node.children {
        print_section(child, depth + 1);
    }
}

fn skeleton_cmd(input: Option<String>, table: bool, format: OutputFormat) -> CliResult<()> {
    let blocks = read_blocks(input)?;
    let snapshot = build(&blocks);
    let skeleton = project(&snapshot);

    print_output(&skeleton, format, |skeleton| {
        if table {
            print_skeleton_table(skeleton);
        } else {
            print_skeleton_tree(skeleton);
        }
    });
    Ok(())
}
