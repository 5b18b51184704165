//! Keyword documentation shown on hover.

use serde::Serialize;

use crate::snapshot::{Position, Snapshot};
use crate::templates::DateStamps;
use crate::word::{word_at, WordRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverDoc {
    /// Markdown when true, plain text otherwise.
    pub markdown: bool,
    pub value: String,
    pub range: WordRange,
}

enum Doc {
    Plain(String),
    Markdown(String),
}

fn example(lead: &str, lines: &[&str]) -> Doc {
    Doc::Markdown(format!(
        "{lead}\n\nExample:\n```jabuti\n{}\n```",
        lines.join("\n")
    ))
}

fn clause_example(lead: &str, kind: &str) -> Doc {
    let head = format!("{kind} clauseName {{");
    example(
        lead,
        &[
            &head,
            "\trolePlayer = application",
            "\toperation = request",
            "\tterms {",
            "\t\t// Add terms here",
            "\t}",
            "}",
        ],
    )
}

fn date_doc(what: &str, stamp: &str) -> Doc {
    let short = stamp.get(..16).unwrap_or(stamp);
    Doc::Plain(format!(
        "The {what} date of the contract.\n\
         Allowed patterns: yyyy-mm-dd HH:mm, yyyy-mm-dd HH:mm:ss\n\
         Examples:\n{stamp}\n{short}"
    ))
}

/// Documentation for the first keyword `word` contains, checked in a fixed
/// priority order (`beginDate` before `dates`, `TimeInterval` before
/// `Timeout`).
fn lookup(word: &str, stamps: &DateStamps) -> Option<Doc> {
    let plain = |text: &str| Some(Doc::Plain(text.to_string()));

    if word.contains("contract") {
        return plain(
            "An agreement between two or more parties who do not trust each other \
             unguardedly. A contract can be modelled as an Event Condition Action (ECA) \
             system where events trigger the execution of actions when certain \
             conditions are satisfied.",
        );
    }
    if word.contains("beginDate") {
        return Some(date_doc("begin", &stamps.begin()));
    }
    if word.contains("dueDate") {
        return Some(date_doc("due", &stamps.due()));
    }
    if word.contains("dates") {
        let begin = format!("\tbeginDate = {}", stamps.begin());
        let due = format!("\tdueDate = {}", stamps.due());
        return Some(example(
            "The dates of the contract.",
            &["dates {", &begin, &due, "}"],
        ));
    }
    if word.contains("parties") {
        return Some(example(
            "An entity (typically an enterprise or a human) that agrees with another \
             to sign an agreement with clauses that stipulate terms and conditions.",
            &[
                "parties {",
                "\tapplication = \"application name\"",
                "\tprocess = \"process name\"",
                "}",
            ],
        ));
    }
    if word.contains("clauses") {
        return Some(example(
            "A statement that stipulates one or more rights, obligations and \
             prohibitions that the parties are expected to observe.",
            &[
                "clauses {",
                "\tclauseType clauseName {",
                "\t\trolePlayer = application",
                "\t\toperation = request",
                "\t\tterms {",
                "\t\t\t// Add terms here",
                "\t\t}",
                "\t}",
                "}",
            ],
        ));
    }
    if word.contains("variables") {
        return plain("The variables of the contract.");
    }
    if word.contains("application") {
        return plain("The application name of the contract.");
    }
    if word.contains("process") {
        return plain("The process name of the contract.");
    }
    if word.contains("right") {
        return Some(clause_example(
            "An action (operation) that a party can perform if it wishes to and a \
             condition holds. The party is free to execute the action (for example, \
             send a purchase order) but can choose not to without negative \
             consequences for the party. The execution of a right is illegal if the \
             party tries to execute it when the conditions are not satisfied.",
            "right",
        ));
    }
    if word.contains("obligation") {
        return Some(clause_example(
            "An action (for example, pay a bill) that a party is expected to execute \
             to comply with the smart contract, when a condition holds. A failure to \
             execute the action that fulfils an obligation results in penalties to be \
             paid by the irresponsible party.",
            "obligation",
        ));
    }
    if word.contains("prohibition") {
        return Some(clause_example(
            "An action that a party is not expected to execute when certain conditions \
             hold unless it wishes to take the risk of being penalised.",
            "prohibition",
        ));
    }
    if word.contains("rolePlayer") {
        return plain("Defines the scope of the clause: application or process.");
    }
    if word.contains("operation") {
        return plain(
            "Defines the type of the operation of the clause.\n\
             Allowed values:\n\
             push | poll | read | write | request | response",
        );
    }
    if word.contains("terms") {
        return Some(example(
            "Used to define the rules of the service level and business level.",
            &["terms {", "\t// Add terms here", "}"],
        ));
    }
    if word.contains("WeekDaysInterval") {
        return plain(
            "A weekday interval.\n\
             WeekDays:\n\
             Monday | Tuesday | Wednesday | Thursday | Friday | Saturday | Sunday\n\n\
             Example:\n\
             WeekDaysInterval(Monday to Friday)",
        );
    }
    if word.contains("TimeInterval") {
        return plain("The time interval.\n\nExample:\nTimeInterval(00:00:00 to 23:00:00)");
    }
    if word.contains("Timeout") {
        return plain("The timeout of the operation, in seconds.\n\nExample:\nTimeout(180)");
    }
    if word.contains("MaxNumberOfOperation") {
        return plain(
            "A max number of operation.\n\
             Allowed intervals:\n\
             Second | Hour | Minute | Day | Week | Month\n\n\
             Example:\n\
             MaxNumberOfOperation(5 per Day)",
        );
    }
    if word.contains("MessageContent") {
        return plain("A message content.");
    }
    if word.contains("onBreach") {
        return plain("Used to perform an action if there is a clause violation.");
    }
    if word.contains("log") {
        return plain("A log function.");
    }
    None
}

/// Hover documentation for the word at `position`.
pub fn hover_at(
    snapshot: &Snapshot<'_>,
    position: Position,
    stamps: &DateStamps,
) -> Option<HoverDoc> {
    let range = word_at(snapshot, position)?;
    let (markdown, value) = match lookup(&range.text, stamps)? {
        Doc::Plain(value) => (false, value),
        Doc::Markdown(value) => (true, value),
    };
    Some(HoverDoc {
        markdown,
        value,
        range,
    })
}
