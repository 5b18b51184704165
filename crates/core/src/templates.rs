//! Whole-contract scaffolds offered in an empty document, and the date
//! stamps they (and date completions) are pre-filled with.

use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use crate::snippet::Snippet;
use crate::vocabulary::Vocabulary;

/// Suggested `beginDate`/`dueDate` values: now, and now plus one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStamps {
    pub begin_date: String,
    pub begin_time: String,
    pub due_date: String,
    pub due_time: String,
}

impl DateStamps {
    pub fn at(now: OffsetDateTime) -> Self {
        let due = now + Duration::DAY;
        Self {
            begin_date: date_part(now),
            begin_time: time_part(now),
            due_date: date_part(due),
            due_time: time_part(due),
        }
    }

    /// Local time when the offset is known, UTC otherwise.
    pub fn now() -> Self {
        Self::at(OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()))
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn begin(&self) -> String {
        format!("{} {}", self.begin_date, self.begin_time)
    }

    pub fn due(&self) -> String {
        format!("{} {}", self.due_date, self.due_time)
    }
}

fn date_part(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

fn time_part(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default()
}

/// Contract head through the `parties` block; slots 1..=7.
fn contract_head(vocab: &Vocabulary, stamps: &DateStamps) -> Snippet {
    Snippet::new()
        .text(format!("{} ", vocab.contract))
        .placeholder(1, "contractName")
        .text(" {\n\tvariables {\n\t\t// Add variables\n\t}\n\n\tdates {\n\t\tbeginDate = ")
        .placeholder(2, stamps.begin_date.as_str())
        .text(" ")
        .placeholder(3, stamps.begin_time.as_str())
        .text("\n\t\tdueDate = ")
        .placeholder(4, stamps.due_date.as_str())
        .text(" ")
        .placeholder(5, stamps.due_time.as_str())
        .text("\n\t}\n\n\tparties {\n\t\tapplication = \"")
        .placeholder(6, "application name")
        .text("\"\n\t\tprocess = \"")
        .placeholder(7, "process name")
        .text("\"\n\t}\n\n\tclauses {\n")
}

/// Clause type, name, role player and operation; uses four slots from `next`.
fn clause_head(snippet: Snippet, vocab: &Vocabulary, kinds: &[&str], next: u32) -> Snippet {
    snippet
        .text("\t\t")
        .choice(next, kinds)
        .text(" ")
        .placeholder(next + 1, "clauseName")
        .text(" {\n\t\t\trolePlayer = ")
        .choice(next + 2, vocab.roles)
        .text("\n\t\t\toperation = ")
        .choice(next + 3, vocab.operations)
        .text("\n\n\t\t\tterms {\n")
}

/// Clause keywords with the `lead`-th moved to the front; the rest keep
/// their vocabulary order.
fn clause_kinds_led_by(vocab: &Vocabulary, lead: usize) -> Vec<&'static str> {
    let names = vocab.clause_keywords.iter().map(|k| k.name);
    names
        .clone()
        .skip(lead)
        .take(1)
        .chain(names.enumerate().filter(|(i, _)| *i != lead).map(|(_, n)| n))
        .collect()
}

/// A minimal contract: one clause with an empty `terms` block.
pub fn sample_contract(vocab: &Vocabulary, stamps: &DateStamps) -> Snippet {
    let kinds = clause_kinds_led_by(vocab, 0);
    clause_head(contract_head(vocab, stamps), vocab, &kinds, 8)
        .text("\t\t\t\t// Add terms\n\t\t\t\t")
        .tabstop(12)
        .text("\n\t\t\t}\n\t\t}\n\t}\n}")
}

/// A fully populated contract: one clause of each type, every term call
/// and an `onBreach` action.
pub fn complete_contract(vocab: &Vocabulary, stamps: &DateStamps) -> Snippet {
    let mut snippet = contract_head(vocab, stamps);
    let mut next = 8;
    for i in 0..vocab.clause_keywords.len() {
        if i > 0 {
            snippet = snippet.text("\n");
        }
        let kinds = clause_kinds_led_by(vocab, i);
        snippet = clause_head(snippet, vocab, &kinds, next);
        next += 4;
        snippet = snippet
            .text("\t\t\t\tWeekDaysInterval(")
            .choice(next, vocab.weekdays)
            .text(" to ")
            .choice(next + 1, vocab.weekdays)
            .text("),\n\t\t\t\tTimeInterval(")
            .placeholder(next + 2, "00:00:00")
            .text(" to ")
            .placeholder(next + 3, "23:59:59")
            .text("),\n\t\t\t\tTimeout(")
            .placeholder(next + 4, "180")
            .text("),\n\t\t\t\tMaxNumberOfOperation(")
            .placeholder(next + 5, "0")
            .text(" per ")
            .choice(next + 6, vocab.time_units)
            .text("),\n\t\t\t\tMessageContent(\"")
            .placeholder(next + 7, "A message content")
            .text("\")\n\t\t\t}\n\n\t\t\tonBreach(")
            .group(
                next + 8,
                Snippet::new()
                    .text("log(\"")
                    .placeholder(next + 9, "A log message")
                    .text("\")"),
            )
            .text(")\n\t\t}\n");
        next += 10;
    }
    snippet.text("\t}\n}")
}
