//! Go-to-definition for party roles.

use crate::completion::compact;
use crate::snapshot::{char_column, Snapshot};
use crate::vocabulary::Vocabulary;
use crate::word::WordRange;

/// Where `word` is declared: the first line of the form `word = ...`.
///
/// Only party roles are referenceable; any other word has no definition.
pub fn find_definition(
    snapshot: &Snapshot<'_>,
    word: &str,
    vocab: &Vocabulary,
) -> Option<WordRange> {
    if !vocab.is_role(word) {
        return None;
    }
    let assignment = format!("{word}=");
    let (line_idx, line) = snapshot
        .lines()
        .iter()
        .enumerate()
        .find(|(_, line)| compact(line).contains(&assignment))?;
    let at = line.find(word)?;
    let start = char_column(line, at);
    Some(WordRange {
        line: line_idx as u32,
        start,
        end: start + word.chars().count() as u32,
        text: word.to_string(),
    })
}
