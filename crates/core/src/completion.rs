//! Context-aware completion suggestions.
//!
//! The cursor context (see [`crate::context`]) is matched against the
//! vocabulary in a fixed priority order. Inside the parentheses of a
//! two-argument term call, only values for the empty side are offered.

use serde::Serialize;

use crate::context::resolve_context;
use crate::scan::first_occurrence;
use crate::snapshot::{byte_column, Position, Snapshot};
use crate::snippet::Snippet;
use crate::templates::{complete_contract, sample_contract, DateStamps};
use crate::vocabulary::{Keyword, ScopeKind, Vocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Class,
    Function,
    Property,
    Value,
    Enum,
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CandidateKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Text to insert instead of the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert: Option<Snippet>,
    /// Re-open the suggestion list after inserting (block scaffolds).
    pub retrigger: bool,
}

impl CompletionCandidate {
    pub fn new(label: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            insert: None,
            retrigger: false,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn insert(mut self, snippet: Snippet) -> Self {
        self.insert = Some(snippet);
        self
    }

    pub fn retrigger(mut self) -> Self {
        self.retrigger = true;
        self
    }
}

/// A term call taking `left <separator> right`.
struct PairedCall {
    name: &'static str,
    separator: &'static str,
    left: fn(&Vocabulary) -> CompletionCandidate,
    right: fn(&Vocabulary) -> CompletionCandidate,
}

fn weekday_choice(vocab: &Vocabulary) -> CompletionCandidate {
    CompletionCandidate::new(vocab.weekdays[0], CandidateKind::Property)
        .insert(Snippet::new().choice(1, vocab.weekdays))
}

fn time_unit_choice(vocab: &Vocabulary) -> CompletionCandidate {
    CompletionCandidate::new(vocab.time_units[0], CandidateKind::Property)
        .insert(Snippet::new().choice(1, vocab.time_units))
}

fn operation_count(_: &Vocabulary) -> CompletionCandidate {
    CompletionCandidate::new("0", CandidateKind::Property)
}

fn start_of_day(_: &Vocabulary) -> CompletionCandidate {
    CompletionCandidate::new("00:00:00", CandidateKind::Property)
}

fn end_of_day(_: &Vocabulary) -> CompletionCandidate {
    CompletionCandidate::new("23:59:59", CandidateKind::Property)
}

const PAIRED_CALLS: &[PairedCall] = &[
    PairedCall {
        name: "WeekDaysInterval",
        separator: "to",
        left: weekday_choice,
        right: weekday_choice,
    },
    PairedCall {
        name: "MaxNumberOfOperation",
        separator: "per",
        left: operation_count,
        right: time_unit_choice,
    },
    PairedCall {
        name: "TimeInterval",
        separator: "to",
        left: start_of_day,
        right: end_of_day,
    },
];

/// Suggestions for the cursor at `position`.
pub fn suggest(
    snapshot: &Snapshot<'_>,
    position: Position,
    vocab: &Vocabulary,
    stamps: &DateStamps,
) -> Vec<CompletionCandidate> {
    if first_occurrence(snapshot, Keyword::new(vocab.contract, ScopeKind::Module)).is_none() {
        return contract_scaffolds(vocab, stamps);
    }

    let line = snapshot.line(position.line).unwrap_or_default();
    let column = byte_column(line, position.character);
    let prefix = &line[..column];

    // Still typing the contract header.
    if !prefix.contains('{') && line.contains(vocab.contract) {
        return Vec::new();
    }

    if let Some(items) = term_argument_suggestions(line, column, vocab) {
        return items;
    }

    let context = resolve_context(snapshot, position.line);
    match context.anchor() {
        Some(anchor) => suggest_for_anchor(anchor, vocab, stamps),
        None => Vec::new(),
    }
}

fn contract_scaffolds(vocab: &Vocabulary, stamps: &DateStamps) -> Vec<CompletionCandidate> {
    vec![
        CompletionCandidate::new(vocab.contract, CandidateKind::Class)
            .detail("A sample contract")
            .insert(sample_contract(vocab, stamps))
            .retrigger(),
        CompletionCandidate::new(vocab.contract, CandidateKind::Class)
            .detail("A complete contract")
            .insert(complete_contract(vocab, stamps))
            .retrigger(),
    ]
}

/// Values for the empty side of `Call(left sep right)` when the cursor is
/// between the parentheses. `None` when the cursor is not inside parentheses.
fn term_argument_suggestions(
    line: &str,
    column: usize,
    vocab: &Vocabulary,
) -> Option<Vec<CompletionCandidate>> {
    let open = line[..column].find('(')?;
    let close = column + line[column..].find(')')?;

    let head = line[..open].trim_end();
    let Some(call) = PAIRED_CALLS.iter().find(|c| head.ends_with(c.name)) else {
        return Some(Vec::new());
    };

    let args: Vec<&str> = line[open + 1..close].split_whitespace().collect();
    if let [left, sep, right] = args.as_slice() {
        if *sep == call.separator && !left.is_empty() && !right.is_empty() {
            return Some(Vec::new());
        }
    }

    let before = compact(&line[open + 1..column]);
    let after = compact(&line[column..close]);

    if after.is_empty() && before.ends_with(call.separator) {
        return Some(vec![(call.right)(vocab)]);
    }
    if before.is_empty() && after.starts_with(call.separator) {
        return Some(vec![(call.left)(vocab)]);
    }
    Some(Vec::new())
}

/// Remove every whitespace character.
pub(crate) fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn suggest_for_anchor(
    anchor: &str,
    vocab: &Vocabulary,
    stamps: &DateStamps,
) -> Vec<CompletionCandidate> {
    if anchor.contains(vocab.contract) {
        return section_candidates(vocab);
    }
    if anchor.contains(vocab.dates) {
        return [vocab.begin_date, vocab.due_date]
            .into_iter()
            .map(|name| {
                CompletionCandidate::new(name, CandidateKind::Property).insert(
                    Snippet::new()
                        .text(format!("{name} = "))
                        .placeholder(1, "0000-00-00")
                        .text(" ")
                        .placeholder(2, "00:00:00"),
                )
            })
            .collect();
    }
    if anchor.contains(vocab.clauses) {
        return vocab
            .clause_keywords
            .iter()
            .map(|kw| {
                CompletionCandidate::new(kw.name, CandidateKind::Function)
                    .insert(
                        Snippet::new()
                            .text(format!("{} ", kw.name))
                            .placeholder(1, "clauseName")
                            .text(" {\n\t")
                            .tabstop(2)
                            .text("\n}"),
                    )
                    .retrigger()
            })
            .collect();
    }
    if vocab.clause_keywords.iter().any(|kw| anchor.contains(kw.name)) {
        return clause_member_candidates(vocab);
    }
    if anchor.contains(vocab.terms) {
        return term_call_candidates(vocab);
    }
    value_candidates(anchor, vocab, stamps)
}

fn block(name: &str) -> Snippet {
    Snippet::new()
        .text(format!("{name} {{\n\t"))
        .tabstop(1)
        .text("\n}")
}

fn section_candidates(vocab: &Vocabulary) -> Vec<CompletionCandidate> {
    vec![
        CompletionCandidate::new(vocab.variables, CandidateKind::Function)
            .insert(block(vocab.variables)),
        CompletionCandidate::new(vocab.dates, CandidateKind::Function)
            .insert(block(vocab.dates))
            .retrigger(),
        CompletionCandidate::new(vocab.parties, CandidateKind::Function)
            .insert(
                Snippet::new()
                    .text(format!("{} {{\n\t{} = \"", vocab.parties, vocab.roles[0]))
                    .placeholder(1, "Application name")
                    .text(format!("\"\n\t{} = \"", vocab.roles[1]))
                    .placeholder(2, "Process name")
                    .text("\"\n}"),
            )
            .retrigger(),
        CompletionCandidate::new(vocab.clauses, CandidateKind::Function)
            .insert(block(vocab.clauses))
            .retrigger(),
    ]
}

fn clause_member_candidates(vocab: &Vocabulary) -> Vec<CompletionCandidate> {
    vec![
        CompletionCandidate::new(vocab.role_player, CandidateKind::Property).insert(
            Snippet::new()
                .text(format!("{} = ", vocab.role_player))
                .choice(1, vocab.roles),
        ),
        CompletionCandidate::new(vocab.operation, CandidateKind::Property).insert(
            Snippet::new()
                .text(format!("{} = ", vocab.operation))
                .choice(1, vocab.operations),
        ),
        CompletionCandidate::new(vocab.terms, CandidateKind::Function)
            .insert(block(vocab.terms))
            .retrigger(),
        CompletionCandidate::new(vocab.on_breach, CandidateKind::Property).insert(
            Snippet::new()
                .text(format!("{}(", vocab.on_breach))
                .group(1, Snippet::new().text("log(\"").tabstop(2).text("\")"))
                .text(")"),
        ),
    ]
}

fn term_call_candidates(vocab: &Vocabulary) -> Vec<CompletionCandidate> {
    let call = |name: &str, body: Snippet| {
        CompletionCandidate::new(name, CandidateKind::Property).insert(
            Snippet::new()
                .text(format!("{name}("))
                .append(body)
                .text(")"),
        )
    };
    vec![
        call(
            "MaxNumberOfOperation",
            Snippet::new()
                .placeholder(1, "0")
                .text(" per ")
                .choice(2, vocab.time_units),
        ),
        call(
            "MessageContent",
            Snippet::new().text("\"").placeholder(1, "A message content").text("\""),
        ),
        call(
            "WeekDaysInterval",
            Snippet::new()
                .choice(1, vocab.weekdays)
                .text(" to ")
                .choice(2, vocab.weekdays),
        ),
        call(
            "TimeInterval",
            Snippet::new()
                .placeholder(1, "00:00:00")
                .text(" to ")
                .placeholder(2, "23:59:59"),
        ),
        call("Timeout", Snippet::new().placeholder(1, "180")),
    ]
}

/// Value-only suggestions keyed on how the anchor line ends.
fn value_candidates(
    anchor: &str,
    vocab: &Vocabulary,
    stamps: &DateStamps,
) -> Vec<CompletionCandidate> {
    let tail: String = {
        let chars: Vec<char> = anchor.chars().collect();
        chars[chars.len().saturating_sub(20)..].iter().collect()
    };
    if tail.contains(vocab.variables) {
        return vec![CompletionCandidate::new(vocab.variables, CandidateKind::Property).insert(
            Snippet::new()
                .placeholder(1, "name")
                .text(" = \"")
                .placeholder(2, "value")
                .text("\""),
        )];
    }

    let assigned = |name: &str| compact(anchor).ends_with(&format!("{name}="));
    let value = |label: String| {
        let snippet = Snippet::new().placeholder(1, label.as_str());
        CompletionCandidate::new(label, CandidateKind::Value).insert(snippet)
    };
    let enumerated = |values: &[&str]| -> Vec<CompletionCandidate> {
        values
            .iter()
            .map(|v| CompletionCandidate::new(*v, CandidateKind::Enum))
            .collect()
    };

    if assigned(vocab.begin_date) {
        return vec![value(stamps.begin())];
    }
    if assigned(vocab.due_date) {
        return vec![value(stamps.due())];
    }
    if assigned(vocab.roles[0]) {
        return vec![CompletionCandidate::new("application name", CandidateKind::Value)
            .insert(Snippet::new().text("\"").placeholder(1, "Application name").text("\""))];
    }
    if assigned(vocab.roles[1]) {
        return vec![CompletionCandidate::new("process name", CandidateKind::Value)
            .insert(Snippet::new().text("\"").placeholder(1, "Process name").text("\""))];
    }
    if assigned(vocab.role_player) {
        return enumerated(vocab.roles);
    }
    if assigned(vocab.operation) {
        return enumerated(vocab.operations);
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn complete(text: &str, line: u32, character: u32) -> Vec<CompletionCandidate> {
        let stamps = DateStamps::at(datetime!(2024-05-01 08:00:00 UTC));
        suggest(
            &Snapshot::new(text),
            Position::new(line, character),
            &Vocabulary::default(),
            &stamps,
        )
    }

    fn labels(items: &[CompletionCandidate]) -> Vec<&str> {
        items.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn empty_document_offers_two_contract_scaffolds() {
        let items = complete("", 0, 0);
        assert_eq!(labels(&items), vec!["contract", "contract"]);
        assert_eq!(items[0].detail.as_deref(), Some("A sample contract"));
        assert_eq!(items[1].detail.as_deref(), Some("A complete contract"));
        assert!(items.iter().all(|c| c.retrigger && c.kind == CandidateKind::Class));
    }

    #[test]
    fn contract_header_line_offers_nothing() {
        assert!(complete("contract Sale", 0, 13).is_empty());
    }

    #[test]
    fn inside_contract_offers_sections() {
        let items = complete("contract C {\n\n}", 1, 0);
        assert_eq!(labels(&items), vec!["variables", "dates", "parties", "clauses"]);
    }

    #[test]
    fn inside_dates_offers_date_attributes() {
        let items = complete("contract C {\n  dates {\n    \n  }\n}", 2, 4);
        assert_eq!(labels(&items), vec!["beginDate", "dueDate"]);
        assert_eq!(
            items[0].insert.as_ref().map(Snippet::render).as_deref(),
            Some("beginDate = ${1:0000-00-00} ${2:00:00:00}")
        );
    }

    #[test]
    fn inside_clauses_offers_exactly_three_clause_types() {
        let items = complete("contract C {\n  clauses {\n    \n  }\n}", 2, 4);
        assert_eq!(labels(&items), vec!["right", "obligation", "prohibition"]);
    }

    #[test]
    fn inside_a_clause_offers_members() {
        let items = complete(
            "contract C {\n  clauses {\n    right A {\n      \n    }\n  }\n}",
            3,
            6,
        );
        assert_eq!(
            labels(&items),
            vec!["rolePlayer", "operation", "terms", "onBreach"]
        );
        let role = items[0].insert.as_ref().unwrap();
        assert_eq!(role.choices(1).map(|c| c.len()), Some(2));
    }

    #[test]
    fn inside_terms_offers_five_calls() {
        let text = "contract C {\n  clauses {\n    right A {\n      terms {\n        \n      }\n    }\n  }\n}";
        let items = complete(text, 4, 8);
        assert_eq!(
            labels(&items),
            vec![
                "MaxNumberOfOperation",
                "MessageContent",
                "WeekDaysInterval",
                "TimeInterval",
                "Timeout"
            ]
        );
        let week = items[2].insert.as_ref().unwrap();
        assert_eq!(week.choices(1).map(|c| c.len()), Some(7));
    }

    #[test]
    fn assignment_lines_offer_values() {
        let text = "contract C {\n  clauses {\n    right A {\n      operation =";
        let items = complete(text, 3, 17);
        assert_eq!(labels(&items), vec!["push", "poll", "read", "write", "request", "response"]);
        assert!(items.iter().all(|c| c.kind == CandidateKind::Enum));

        let text = "contract C {\n  dates {\n    dueDate =";
        let items = complete(text, 2, 13);
        assert_eq!(labels(&items), vec!["2024-05-02 08:00:00"]);
    }

    #[test]
    fn variables_block_offers_a_declaration() {
        let items = complete("contract C {\n  variables {\n    \n  }\n}", 2, 4);
        assert_eq!(labels(&items), vec!["variables"]);
    }

    #[test]
    fn paired_call_offers_values_for_the_empty_side() {
        let text = "contract C {\n  terms {\n    WeekDaysInterval(Monday to )\n  }\n}";
        let items = complete(text, 2, 30);
        assert_eq!(labels(&items), vec!["Monday"]);

        let text = "contract C {\n  terms {\n    MaxNumberOfOperation( per Day)\n  }\n}";
        let items = complete(text, 2, 25);
        assert_eq!(labels(&items), vec!["0"]);

        let text = "contract C {\n  terms {\n    MaxNumberOfOperation(5 per )\n  }\n}";
        let items = complete(text, 2, 31);
        assert_eq!(labels(&items), vec!["Second"]);

        let text = "contract C {\n  terms {\n    TimeInterval( to 10:00:00)\n  }\n}";
        let items = complete(text, 2, 17);
        assert_eq!(labels(&items), vec!["00:00:00"]);
    }

    #[test]
    fn complete_pair_offers_nothing() {
        let text = "contract C {\n  terms {\n    WeekDaysInterval(Monday to Friday)\n  }\n}";
        assert!(complete(text, 2, 30).is_empty());
    }

    #[test]
    fn other_parentheses_offer_nothing() {
        let text = "contract C {\n  terms {\n    Timeout()\n  }\n}";
        assert!(complete(text, 2, 12).is_empty());
    }
}
