//! Whole-document formatting.

use jabuti_core::format_edits;
use lsp_types::{Range, TextEdit};

use crate::navigation::to_position;

/// Edits that make `content` canonical; empty when it already is.
pub fn format_document(content: &str) -> Vec<TextEdit> {
    format_edits(content)
        .into_iter()
        .map(|edit| TextEdit {
            range: Range::new(to_position(edit.start), to_position(edit.end)),
            new_text: edit.new_text,
        })
        .collect()
}
