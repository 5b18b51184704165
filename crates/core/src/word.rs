//! The word under the cursor, delimited by spaces.

use serde::Serialize;

use crate::snapshot::{byte_column, char_column, Position, Snapshot};

/// A space-delimited word on one line; columns are in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRange {
    pub line: u32,
    pub start: u32,
    pub end: u32,
    /// The delimited text with any remaining whitespace removed.
    pub text: String,
}

impl WordRange {
    pub fn start_position(&self) -> Position {
        Position::new(self.line, self.start)
    }

    pub fn end_position(&self) -> Position {
        Position::new(self.line, self.end)
    }
}

/// The word around `position`, or `None` when it is empty (cursor on a
/// space or past the end of the document).
///
/// Only the space character delimits; a tab-indented word keeps its tabs
/// inside the range but not in `text`.
pub fn word_at(snapshot: &Snapshot<'_>, position: Position) -> Option<WordRange> {
    let line = snapshot.line(position.line)?;
    let cursor = byte_column(line, position.character);

    let start = line[..cursor].rfind(' ').map_or(0, |idx| idx + 1);
    let end = line[cursor..].find(' ').map_or(line.len(), |idx| cursor + idx);

    let text: String = line[start..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if text.is_empty() {
        return None;
    }
    Some(WordRange {
        line: position.line,
        start: char_column(line, start),
        end: char_column(line, end),
        text,
    })
}
