//! Keyword occurrence scanning.
//!
//! Finds every place a literal keyword appears in the document as a whole
//! identifier, skipping matches that sit inside a string literal or a
//! comment. Each keyword is scanned independently; the scope builder merges
//! the results.

use std::ops::Range;

use crate::segment::is_code_prefix;
use crate::snapshot::{byte_column, Position, Snapshot};
use crate::vocabulary::{Keyword, ScopeKind};

/// One match of a keyword in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub name: &'a str,
    /// Byte offset of the match in the document text.
    pub offset: usize,
    pub position: Position,
    pub kind: ScopeKind,
}

/// All code occurrences of `keyword`, in ascending offset order.
pub fn find_occurrences<'a>(snapshot: &Snapshot<'a>, keyword: Keyword) -> Vec<Occurrence<'a>> {
    find_occurrences_in(snapshot, keyword.name, keyword.kind, 0..snapshot.text().len())
}

/// First code occurrence of `keyword`, if any.
pub fn first_occurrence<'a>(snapshot: &Snapshot<'a>, keyword: Keyword) -> Option<Occurrence<'a>> {
    find_occurrences(snapshot, keyword).into_iter().next()
}

/// Code occurrences of `needle` whose match starts within `range`.
pub fn find_occurrences_in<'a>(
    snapshot: &Snapshot<'a>,
    needle: &'a str,
    kind: ScopeKind,
    range: Range<usize>,
) -> Vec<Occurrence<'a>> {
    let text = snapshot.text();
    let Some(haystack) = text.get(range.clone()) else {
        return Vec::new();
    };
    if needle.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(needle)
        .map(|(idx, _)| idx + range.start)
        .filter(|&offset| is_whole_word(text, offset, needle.len()))
        .filter_map(|offset| {
            // Nothing can precede a match at the very start of the document.
            if offset == 0 {
                return Some(Occurrence {
                    name: needle,
                    offset,
                    position: Position::new(0, 0),
                    kind,
                });
            }
            let position = snapshot.position_at(offset);
            let line = snapshot.line(position.line)?;
            let prefix = &line[..byte_column(line, position.character)];
            is_code_prefix(prefix).then_some(Occurrence {
                name: needle,
                offset,
                position,
                kind,
            })
        })
        .collect()
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_whole_word(text: &str, offset: usize, len: usize) -> bool {
    let before = text[..offset].chars().next_back();
    let after = text[offset + len..].chars().next();
    !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> Keyword {
        Keyword::new("terms", ScopeKind::Field)
    }

    #[test]
    fn finds_every_code_occurrence_in_order() {
        let text = "terms {\n}\nright A {\n  terms {\n  }\n}";
        let snap = Snapshot::new(text);
        let found = find_occurrences(&snap, terms());
        let positions: Vec<Position> = found.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![Position::new(0, 0), Position::new(3, 2)]);
        assert!(found.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn skips_matches_in_comments_and_strings() {
        let text = "// terms\nx = \"terms\"\n/* terms */\nterms {}";
        let snap = Snapshot::new(text);
        let found = find_occurrences(&snap, terms());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Position::new(3, 0));
    }

    #[test]
    fn two_matches_on_one_line_get_their_own_columns() {
        let snap = Snapshot::new("  terms terms");
        let found = find_occurrences(&snap, terms());
        let columns: Vec<u32> = found.iter().map(|o| o.position.character).collect();
        assert_eq!(columns, vec![2, 8]);
    }

    #[test]
    fn keywords_inside_longer_identifiers_do_not_match() {
        let snap = Snapshot::new("copyright = \"x\"\nright A {}");
        let found = find_occurrences(&snap, Keyword::new("right", ScopeKind::Field));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Position::new(1, 0));
    }

    #[test]
    fn absent_keyword_yields_nothing() {
        let snap = Snapshot::new("contract {}");
        assert!(find_occurrences(&snap, terms()).is_empty());
        assert!(first_occurrence(&snap, terms()).is_none());
    }

    #[test]
    fn whole_word_search_respects_identifier_boundaries() {
        let text = "variables { a = \"1\" name = \"a\" a = \"2\" }";
        let snap = Snapshot::new(text);
        let found = find_occurrences_in(&snap, "a", ScopeKind::Variable, 0..text.len());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].position, Position::new(0, 12));
    }
}
