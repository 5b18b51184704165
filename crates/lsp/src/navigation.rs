//! Outline and go-to-definition.
//!
//! The outline is the engine's scope tree converted to nested
//! `DocumentSymbol`s. Definitions exist only for party roles and always
//! resolve within the same document.

use jabuti_core::{
    build_scope_tree, find_definition, word_at, ScopeKind, ScopeNode, Snapshot, Vocabulary,
    WordRange,
};
use lsp_types::{DocumentSymbol, Location, Position, Range, SymbolKind, Uri};

pub fn symbol_kind(kind: ScopeKind) -> SymbolKind {
    match kind {
        ScopeKind::Module => SymbolKind::MODULE,
        ScopeKind::Field => SymbolKind::FIELD,
        ScopeKind::Property => SymbolKind::PROPERTY,
        ScopeKind::Function => SymbolKind::FUNCTION,
        ScopeKind::Variable => SymbolKind::VARIABLE,
    }
}

/// Nested outline of `content`; empty for a blank document.
pub fn document_symbols(content: &str) -> Vec<DocumentSymbol> {
    let snapshot = Snapshot::new(content);
    build_scope_tree(&snapshot, &Vocabulary::default())
        .map(|root| vec![to_symbol(root)])
        .unwrap_or_default()
}

/// Convert a scope node. The selection covers the keyword; the full range
/// extends to the end of the last descendant.
#[allow(deprecated)] // DocumentSymbol::deprecated must still be initialized
fn to_symbol(node: ScopeNode) -> DocumentSymbol {
    let start = to_position(node.position);
    let selection_end = Position::new(
        node.position.line,
        node.position.character + node.label.chars().count() as u32,
    );
    let selection_range = Range::new(start, selection_end);

    let children: Vec<DocumentSymbol> = node.children.into_iter().map(to_symbol).collect();
    let end = children
        .iter()
        .map(|c| c.range.end)
        .fold(selection_end, |acc, p| {
            if (p.line, p.character) > (acc.line, acc.character) {
                p
            } else {
                acc
            }
        });

    DocumentSymbol {
        name: node.label,
        detail: node.detail,
        kind: symbol_kind(node.kind),
        tags: None,
        deprecated: None,
        range: Range::new(start, end),
        selection_range,
        children: (!children.is_empty()).then_some(children),
    }
}

pub fn to_range(word: &WordRange) -> Range {
    Range::new(
        to_position(word.start_position()),
        to_position(word.end_position()),
    )
}

pub fn to_position(position: jabuti_core::Position) -> Position {
    Position::new(position.line, position.character)
}

/// Go-to-definition: the declaring line of the party role at `position`.
pub fn goto_definition(uri: &Uri, position: Position, content: &str) -> Option<Location> {
    let snapshot = Snapshot::new(content);
    let at = jabuti_core::Position::new(position.line, position.character);
    let word = word_at(&snapshot, at)?;
    let target = find_definition(&snapshot, &word.text, &Vocabulary::default())?;
    Some(Location::new(uri.clone(), to_range(&target)))
}
