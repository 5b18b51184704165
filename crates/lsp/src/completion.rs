//! Completion items for the cursor context.
//!
//! Candidates come from the engine; this module maps them onto
//! `CompletionItem`s. Snippet inserts use `InsertTextFormat::SNIPPET`, and
//! block scaffolds carry the `editor.action.triggerSuggest` command so the
//! editor offers the block's members right after insertion.

use jabuti_core::{suggest, CandidateKind, CompletionCandidate, DateStamps, Snapshot, Vocabulary};
use lsp_types::{Command, CompletionItem, CompletionItemKind, InsertTextFormat, Position};

/// Characters that make the client ask for completions.
pub const TRIGGER_CHARACTERS: &[&str] = &["{", "(", "=", " "];

pub const RETRIGGER_COMMAND: &str = "editor.action.triggerSuggest";

pub fn item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Class => CompletionItemKind::CLASS,
        CandidateKind::Function => CompletionItemKind::FUNCTION,
        CandidateKind::Property => CompletionItemKind::PROPERTY,
        CandidateKind::Value => CompletionItemKind::VALUE,
        CandidateKind::Enum => CompletionItemKind::ENUM,
    }
}

/// Compute completions for the given position in the document.
pub fn compute_completions(
    content: &str,
    position: Position,
    stamps: &DateStamps,
) -> Vec<CompletionItem> {
    let snapshot = Snapshot::new(content);
    let at = jabuti_core::Position::new(position.line, position.character);
    suggest(&snapshot, at, &Vocabulary::default(), stamps)
        .into_iter()
        .map(to_completion_item)
        .collect()
}

pub fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    let (insert_text, insert_text_format) = match &candidate.insert {
        Some(snippet) if snippet.is_plain() => (Some(snippet.plain_text()), None),
        Some(snippet) => (Some(snippet.render()), Some(InsertTextFormat::SNIPPET)),
        None => (None, None),
    };
    let command = candidate.retrigger.then(|| Command {
        title: "Re-trigger completions".to_string(),
        command: RETRIGGER_COMMAND.to_string(),
        arguments: None,
    });

    CompletionItem {
        label: candidate.label,
        kind: Some(item_kind(candidate.kind)),
        detail: candidate.detail,
        insert_text,
        insert_text_format,
        command,
        ..Default::default()
    }
}
