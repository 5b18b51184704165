//! One-shot editor requests against a file: the same answers the language
//! server gives, printed as text or JSON.

use std::path::Path;

use jabuti_core::{
    build_scope_tree, find_definition, hover_at, suggest, word_at, DateStamps, Position,
    ScopeNode, Snapshot, Vocabulary,
};
use serde::Serialize;
use tracing::debug;

use super::read_source;
use crate::error::CliError;
use crate::{CursorArgs, OutputFormat};

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Engine position for a 1-based command-line cursor.
fn cursor_position(cursor: &CursorArgs) -> Position {
    Position::new(cursor.line.saturating_sub(1), cursor.column.saturating_sub(1))
}

pub(crate) fn cmd_outline(file: &Path, output: OutputFormat) -> Result<(), CliError> {
    let source = read_source(file)?;
    let tree = build_scope_tree(&Snapshot::new(&source), &Vocabulary::default());
    debug!(file = %file.display(), empty = tree.is_none(), "outline");

    match output {
        OutputFormat::Json => print_json(&tree),
        OutputFormat::Text => {
            if let Some(root) = &tree {
                print_node(root, 0);
            }
            Ok(())
        }
    }
}

fn print_node(node: &ScopeNode, depth: usize) {
    let detail = node
        .detail
        .as_deref()
        .map(|d| format!(" {d}"))
        .unwrap_or_default();
    println!(
        "{}{}{} ({}:{})",
        "  ".repeat(depth),
        node.label,
        detail,
        node.position.line + 1,
        node.position.character + 1
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}

pub(crate) fn cmd_complete(cursor: &CursorArgs, output: OutputFormat) -> Result<(), CliError> {
    let source = read_source(&cursor.file)?;
    let items = suggest(
        &Snapshot::new(&source),
        cursor_position(cursor),
        &Vocabulary::default(),
        &DateStamps::now(),
    );
    debug!(count = items.len(), "completion candidates");

    match output {
        OutputFormat::Json => print_json(&items),
        OutputFormat::Text => {
            for item in &items {
                match &item.detail {
                    Some(detail) => println!("{}\t{}", item.label, detail),
                    None => println!("{}", item.label),
                }
            }
            Ok(())
        }
    }
}

pub(crate) fn cmd_hover(cursor: &CursorArgs, output: OutputFormat) -> Result<(), CliError> {
    let source = read_source(&cursor.file)?;
    let doc = hover_at(
        &Snapshot::new(&source),
        cursor_position(cursor),
        &DateStamps::now(),
    );

    match output {
        OutputFormat::Json => print_json(&doc),
        OutputFormat::Text => {
            if let Some(doc) = doc {
                println!("{}", doc.value);
            }
            Ok(())
        }
    }
}

pub(crate) fn cmd_definition(cursor: &CursorArgs, output: OutputFormat) -> Result<(), CliError> {
    let source = read_source(&cursor.file)?;
    let snapshot = Snapshot::new(&source);
    let target = word_at(&snapshot, cursor_position(cursor))
        .and_then(|word| find_definition(&snapshot, &word.text, &Vocabulary::default()));

    match output {
        OutputFormat::Json => print_json(&target),
        OutputFormat::Text => {
            if let Some(range) = target {
                println!(
                    "{}:{}:{}",
                    cursor.file.display(),
                    range.line + 1,
                    range.start + 1
                );
            }
            Ok(())
        }
    }
}
