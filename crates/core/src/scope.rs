//! Outline recovery: contract → sections → clauses → terms.
//!
//! Nesting is recovered without a grammar. Section nodes come from the
//! first occurrence of each section keyword; clause and term membership
//! comes from a nearest-preceding-owner pass over position-sorted
//! occurrences (see [`group_by_nearest_owner`]).

use std::ops::Range;

use serde::Serialize;

use crate::scan::{
    find_occurrences, find_occurrences_in, first_occurrence, is_ident_char, Occurrence,
};
use crate::snapshot::{Position, Snapshot};
use crate::variables::variable_nodes;
use crate::vocabulary::{Keyword, ScopeKind, Vocabulary};

/// One node of the recovered outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeNode {
    pub label: String,
    pub kind: ScopeKind,
    pub position: Position,
    /// Clause name for clauses, argument text for term calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScopeNode>,
}

impl ScopeNode {
    pub fn new(label: impl Into<String>, kind: ScopeKind, position: Position) -> Self {
        Self {
            label: label.into(),
            kind,
            position,
            detail: None,
            children: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn child(&self, label: &str) -> Option<&ScopeNode> {
        self.children.iter().find(|c| c.label == label)
    }

    fn from_occurrence(occ: &Occurrence<'_>) -> Self {
        Self::new(occ.name, occ.kind, occ.position)
    }
}

/// Build the outline for a document.
///
/// Returns `None` only for a blank document. A root `contract` node is
/// always produced otherwise, anchored at (0, 0) when the keyword is absent.
pub fn build_scope_tree(snapshot: &Snapshot<'_>, vocab: &Vocabulary) -> Option<ScopeNode> {
    if snapshot.text().trim().is_empty() {
        return None;
    }

    let contract = Keyword::new(vocab.contract, ScopeKind::Module);
    let root_position = first_occurrence(snapshot, contract)
        .map(|occ| occ.position)
        .unwrap_or_default();
    let mut root = ScopeNode::new(vocab.contract, ScopeKind::Module, root_position);

    let section = |name| first_occurrence(snapshot, Keyword::new(name, ScopeKind::Field));

    if let Some(occ) = section(vocab.variables) {
        let mut node = ScopeNode::from_occurrence(&occ);
        node.children = variable_nodes(snapshot, occ.offset);
        root.children.push(node);
    }
    if let Some(occ) = section(vocab.dates) {
        let members = [vocab.begin_date, vocab.due_date];
        root.children.push(section_with_members(snapshot, &occ, &members));
    }
    if let Some(occ) = section(vocab.parties) {
        root.children.push(section_with_members(snapshot, &occ, vocab.roles));
    }
    if let Some(occ) = section(vocab.clauses) {
        let mut node = ScopeNode::from_occurrence(&occ);
        node.children = clause_nodes(snapshot, vocab);
        root.children.push(node);
    }

    root.children.sort_by_key(|c| c.position);
    Some(root)
}

/// A flat section (`dates`, `parties`) whose members are attribute keywords
/// found inside its block.
fn section_with_members(
    snapshot: &Snapshot<'_>,
    section: &Occurrence<'_>,
    members: &[&'static str],
) -> ScopeNode {
    let mut node = ScopeNode::from_occurrence(section);
    let Some(block) = flat_block(snapshot.text(), section.offset) else {
        return node;
    };
    node.children = members
        .iter()
        .filter_map(|&name| {
            find_occurrences_in(snapshot, name, ScopeKind::Property, block.clone())
                .into_iter()
                .next()
        })
        .map(|occ| ScopeNode::from_occurrence(&occ))
        .collect();
    node.children.sort_by_key(|c| c.position);
    node
}

/// Clause nodes with their members, and `terms` nodes with their calls.
///
/// `terms` is grouped first so the populated `terms` nodes can then be
/// handed to the clause pass as ordinary members.
fn clause_nodes(snapshot: &Snapshot<'_>, vocab: &Vocabulary) -> Vec<ScopeNode> {
    let text = snapshot.text();

    let terms_keyword = Keyword::new(vocab.terms, ScopeKind::Field);
    let terms_nodes = find_occurrences(snapshot, terms_keyword)
        .into_iter()
        .map(|occ| (occ.offset, ScopeNode::from_occurrence(&occ)))
        .collect();
    let calls = scan_all(snapshot, vocab.term_calls)
        .into_iter()
        .map(|occ| {
            let node = ScopeNode::from_occurrence(&occ).with_detail(call_arguments(text, &occ));
            (occ.offset, node)
        })
        .collect();
    let terms_nodes = group_by_nearest_owner(terms_nodes, calls);

    let clauses = scan_all(snapshot, vocab.clause_keywords)
        .into_iter()
        .map(|occ| {
            let node = ScopeNode::from_occurrence(&occ).with_detail(clause_name(text, &occ));
            (occ.offset, node)
        })
        .collect();
    let mut members: Vec<(usize, ScopeNode)> = scan_all(snapshot, vocab.clause_members)
        .into_iter()
        .filter(|occ| occ.name != vocab.terms)
        .map(|occ| (occ.offset, ScopeNode::from_occurrence(&occ)))
        .collect();
    members.extend(terms_nodes);

    group_by_nearest_owner(clauses, members)
        .into_iter()
        .map(|(_, node)| node)
        .collect()
}

fn scan_all<'a>(snapshot: &Snapshot<'a>, keywords: &[Keyword]) -> Vec<Occurrence<'a>> {
    keywords
        .iter()
        .flat_map(|kw| find_occurrences(snapshot, *kw))
        .collect()
}

/// Attach every member to the owner with the greatest offset not after the
/// member's own offset.
///
/// Members that precede every owner are dropped rather than attached to a
/// following owner. Owners and members come back sorted by offset.
pub fn group_by_nearest_owner(
    mut owners: Vec<(usize, ScopeNode)>,
    mut members: Vec<(usize, ScopeNode)>,
) -> Vec<(usize, ScopeNode)> {
    owners.sort_by_key(|(offset, _)| *offset);
    members.sort_by_key(|(offset, _)| *offset);

    for (offset, member) in members {
        let idx = owners.partition_point(|(owner, _)| *owner <= offset);
        if let Some((_, owner)) = idx.checked_sub(1).and_then(|i| owners.get_mut(i)) {
            owner.children.push(member);
        }
    }
    owners
}

/// The identifier following a clause keyword: `right A {` → `A`.
fn clause_name(text: &str, occ: &Occurrence<'_>) -> Option<String> {
    let rest = text[occ.offset + occ.name.len()..].trim_start_matches([' ', '\t']);
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(rest.len(), |(i, _)| i);
    (end > 0).then(|| rest[..end].to_string())
}

/// Text between a term call's parentheses, limited to its own line.
fn call_arguments(text: &str, occ: &Occurrence<'_>) -> Option<String> {
    let rest = text[occ.offset + occ.name.len()..].trim_start_matches([' ', '\t']);
    let inner = rest.strip_prefix('(')?;
    let line = inner.split('\n').next().unwrap_or_default();

    let mut depth = 0usize;
    let mut in_str = false;
    let mut end = line.len();
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_str = !in_str,
            '(' if !in_str => depth += 1,
            ')' if !in_str => {
                if depth == 0 {
                    end = i;
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    let args = line[..end].trim();
    (!args.is_empty()).then(|| args.to_string())
}

/// Byte range between the first `{` at or after `from` and the first `}`
/// after it. Nested braces are not tracked; a missing `}` runs to the end.
pub(crate) fn flat_block(text: &str, from: usize) -> Option<Range<usize>> {
    let open = from + text.get(from..)?.find('{')? + 1;
    let close = text[open..].find('}').map_or(text.len(), |p| open + p);
    Some(open..close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> ScopeNode {
        build_scope_tree(&Snapshot::new(text), &Vocabulary::default()).expect("root")
    }

    fn labels(node: &ScopeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn blank_document_has_no_outline() {
        assert!(build_scope_tree(&Snapshot::new("  \n"), &Vocabulary::default()).is_none());
    }

    #[test]
    fn root_is_emitted_even_without_contract_keyword() {
        let root = tree("\n\nparties {\n  process = \"P\"\n}");
        assert_eq!(root.label, "contract");
        assert_eq!(root.position, Position::new(0, 0));
        assert_eq!(labels(&root), vec!["parties"]);
    }

    #[test]
    fn sections_are_ordered_by_position() {
        let root = tree("contract C {\n  parties {\n  }\n  dates {\n  }\n  variables {\n  }\n}");
        assert_eq!(labels(&root), vec!["parties", "dates", "variables"]);
    }

    #[test]
    fn dates_members_come_from_the_dates_block() {
        let root = tree(
            "contract C {\n  dates {\n    dueDate = 2024-01-02 00:00:00\n    beginDate = 2024-01-01 00:00:00\n  }\n}",
        );
        let dates = root.child("dates").unwrap();
        assert_eq!(labels(dates), vec!["dueDate", "beginDate"]);
        assert!(dates.children.iter().all(|c| c.kind == ScopeKind::Property));
    }

    #[test]
    fn role_values_in_clauses_are_not_party_members() {
        let root = tree(
            "contract C {\n  parties {\n    application = \"A\"\n  }\n  clauses {\n    right R {\n      rolePlayer = process\n    }\n  }\n}",
        );
        assert_eq!(labels(root.child("parties").unwrap()), vec!["application"]);
    }

    #[test]
    fn clause_and_term_details() {
        let root = tree(
            "contract C {\n  clauses {\n    obligation PayOnTime {\n      terms {\n        MaxNumberOfOperation(5 per Day)\n      }\n    }\n  }\n}",
        );
        let clause = &root.child("clauses").unwrap().children[0];
        assert_eq!(clause.label, "obligation");
        assert_eq!(clause.detail.as_deref(), Some("PayOnTime"));
        let call = &clause.child("terms").unwrap().children[0];
        assert_eq!(call.label, "MaxNumberOfOperation");
        assert_eq!(call.detail.as_deref(), Some("5 per Day"));
    }

    #[test]
    fn members_before_any_owner_are_dropped() {
        let owners = vec![(10, ScopeNode::new("right", ScopeKind::Field, Position::new(1, 0)))];
        let members = vec![
            (2, ScopeNode::new("rolePlayer", ScopeKind::Property, Position::new(0, 2))),
            (12, ScopeNode::new("operation", ScopeKind::Property, Position::new(1, 2))),
        ];
        let grouped = group_by_nearest_owner(owners, members);
        assert_eq!(grouped.len(), 1);
        assert_eq!(labels(&grouped[0].1), vec!["operation"]);
    }

    #[test]
    fn members_after_the_last_owner_belong_to_it() {
        let owners = vec![
            (0, ScopeNode::new("right", ScopeKind::Field, Position::new(0, 0))),
            (20, ScopeNode::new("obligation", ScopeKind::Field, Position::new(2, 0))),
        ];
        let members = vec![(
            50,
            ScopeNode::new("onBreach", ScopeKind::Function, Position::new(5, 0)),
        )];
        let grouped = group_by_nearest_owner(owners, members);
        assert!(grouped[0].1.children.is_empty());
        assert_eq!(labels(&grouped[1].1), vec!["onBreach"]);
    }
}
