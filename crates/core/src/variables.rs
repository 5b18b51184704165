//! Variable names declared in the `variables` block.

use crate::scan::{find_occurrences_in, is_ident_char};
use crate::scope::{flat_block, ScopeNode};
use crate::segment::{SegmentKind, Segmenter};
use crate::snapshot::Snapshot;
use crate::vocabulary::ScopeKind;

/// One node per distinct declared name, in first-declaration order. Each
/// node carries every occurrence of its name inside the block as children,
/// so a re-declared name shows up once with several occurrences.
pub fn variable_nodes(snapshot: &Snapshot<'_>, variables_offset: usize) -> Vec<ScopeNode> {
    let text = snapshot.text();
    let Some(block) = flat_block(text, variables_offset) else {
        return Vec::new();
    };

    declared_names(&text[block.clone()])
        .into_iter()
        .filter_map(|name| {
            let occurrences =
                find_occurrences_in(snapshot, name, ScopeKind::Variable, block.clone());
            let first = occurrences.first()?;
            let mut node = ScopeNode::new(name, ScopeKind::Variable, first.position);
            node.children = occurrences
                .iter()
                .map(|occ| ScopeNode::new(name, ScopeKind::Variable, occ.position))
                .collect();
            Some(node)
        })
        .collect()
}

/// Identifiers immediately before an `=` in code, deduplicated.
pub fn declared_names(block: &str) -> Vec<&str> {
    let mut segmenter = Segmenter::new();
    let mut names: Vec<&str> = Vec::new();

    for line in block.lines() {
        for segment in segmenter.split(line) {
            if segment.kind != SegmentKind::Code {
                continue;
            }
            let code = segment.text;
            for (eq, _) in code.match_indices('=') {
                let before = code[..eq].trim_end_matches([' ', '\t']);
                let start = before
                    .char_indices()
                    .rev()
                    .take_while(|(_, c)| is_ident_char(*c))
                    .last()
                    .map(|(i, _)| i);
                if let Some(start) = start {
                    let name = &before[start..];
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
    }
    names
}
