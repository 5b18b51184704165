//! Hover information for DSL keywords.

use jabuti_core::{hover_at, DateStamps, Snapshot};
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::navigation::to_range;

/// Compute hover information for the word at the given position.
pub fn compute_hover(content: &str, position: Position, stamps: &DateStamps) -> Option<Hover> {
    let snapshot = Snapshot::new(content);
    let at = jabuti_core::Position::new(position.line, position.character);
    let doc = hover_at(&snapshot, at, stamps)?;
    let kind = if doc.markdown {
        MarkupKind::Markdown
    } else {
        MarkupKind::PlainText
    };
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind,
            value: doc.value,
        }),
        range: Some(to_range(&doc.range)),
    })
}
