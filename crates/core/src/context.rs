//! Cursor context: which construct encloses a given line.
//!
//! Walks upward from the cursor line keeping a count of closing braces that
//! still need a matching opener. The first line ending in `=` (an attribute
//! being typed) or the first unmatched opener wins. The result is a
//! classification string, not a parse.

use crate::snapshot::Snapshot;

/// Outcome of the upward walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorContext {
    /// A line ending in `=`: a value is being typed.
    Assignment(String),
    /// The nearest unmatched `{` line above the cursor.
    Opener(String),
    /// Top of file reached unresolved; carries the last non-blank line seen.
    Exhausted(Option<String>),
}

impl CursorContext {
    /// The anchor text used for classification, if any.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            CursorContext::Assignment(line) | CursorContext::Opener(line) => Some(line),
            CursorContext::Exhausted(last) => last.as_deref(),
        }
    }
}

#[derive(Debug)]
enum WalkState {
    Scanning { debt: usize },
    Done(CursorContext),
}

/// Collapse whitespace runs to one space and trim.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve the context enclosing `cursor_line`.
///
/// The cursor line itself may close a block or end in `=`, but its own `{`
/// never counts as the enclosing opener.
pub fn resolve_context(snapshot: &Snapshot<'_>, cursor_line: u32) -> CursorContext {
    let lines = snapshot.lines();
    if lines.is_empty() {
        return CursorContext::Exhausted(None);
    }
    let cursor = (cursor_line as usize).min(lines.len() - 1);

    let mut state = WalkState::Scanning { debt: 0 };
    let mut last_seen: Option<String> = None;

    for idx in (0..=cursor).rev() {
        let line = normalize_line(lines[idx]);
        if line.is_empty() {
            continue;
        }
        match step(state, &line, idx == cursor) {
            WalkState::Done(context) => return context,
            next => state = next,
        }
        last_seen = Some(line);
    }
    CursorContext::Exhausted(last_seen)
}

fn step(state: WalkState, line: &str, is_cursor_line: bool) -> WalkState {
    let WalkState::Scanning { mut debt } = state else {
        return state;
    };
    if line.ends_with('=') {
        return WalkState::Done(CursorContext::Assignment(line.to_string()));
    }
    if line.contains('}') {
        debt += 1;
    }
    if line.contains('{') && !is_cursor_line {
        if debt == 0 {
            return WalkState::Done(CursorContext::Opener(line.to_string()));
        }
        debt -= 1;
    }
    WalkState::Scanning { debt }
}
