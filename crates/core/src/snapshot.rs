//! Immutable view of a document for the duration of one request.
//!
//! Every analysis works from a `Snapshot`: the raw text plus its
//! line-split view. Positions are zero-based and count characters
//! (Unicode scalar values) within a line.

use serde::Serialize;

/// A zero-based (line, character) position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Document text plus line offsets, built once per request.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
}

impl<'a> Snapshot<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut line_starts = Vec::new();
        let mut start = 0;
        for raw in text.split('\n') {
            line_starts.push(start);
            start += raw.len() + 1;
            lines.push(raw.strip_suffix('\r').unwrap_or(raw));
        }
        Self {
            text,
            lines,
            line_starts,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// All lines, `\r` stripped. A trailing newline yields a final empty line.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn line(&self, line: u32) -> Option<&'a str> {
        self.lines.get(line as usize).copied()
    }

    /// Translate a byte offset into a position. Offsets past the end clamp
    /// to the end of the document.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let start = self.line_starts[line];
        let character = self
            .text
            .get(start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        Position::new(line as u32, character as u32)
    }

    /// Translate a position into a byte offset. A column past the end of the
    /// line clamps to the line end; a line past the end yields `None`.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let idx = position.line as usize;
        let line = self.lines.get(idx)?;
        let column = byte_column(line, position.character);
        Some(self.line_starts[idx] + column)
    }

    /// Position just past the last character of the document.
    pub fn end_position(&self) -> Position {
        let last = self.lines.len().saturating_sub(1);
        let width = self.lines.get(last).map_or(0, |l| l.chars().count());
        Position::new(last as u32, width as u32)
    }
}

/// Byte index of the `character`-th char of `line`, clamped to its length.
pub fn byte_column(line: &str, character: u32) -> usize {
    line.char_indices()
        .nth(character as usize)
        .map_or(line.len(), |(idx, _)| idx)
}

/// Character count of `line[..byte]`.
pub fn char_column(line: &str, byte: usize) -> u32 {
    line.get(..byte.min(line.len()))
        .map_or(0, |prefix| prefix.chars().count()) as u32
}
