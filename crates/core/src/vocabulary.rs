//! Keyword vocabulary and closed value sets of the Jabuti DSL.
//!
//! The structural passes (scanner, scope tree, cursor context, definition)
//! read every keyword from a `Vocabulary` passed in as immutable data.
//! Hover texts and term-call argument templates are written for specific
//! keywords and spell those names out.

use serde::Serialize;

/// Classification attached to every scanned keyword and outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// The contract root.
    Module,
    /// Sections, clauses and `terms` blocks.
    Field,
    /// Attributes such as `beginDate` or `rolePlayer`.
    Property,
    /// Term calls and `onBreach`.
    Function,
    /// Names declared in the `variables` block.
    Variable,
}

/// A keyword together with the kind it is reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub kind: ScopeKind,
}

impl Keyword {
    pub const fn new(name: &'static str, kind: ScopeKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub contract: &'static str,
    pub variables: &'static str,
    pub dates: &'static str,
    pub parties: &'static str,
    pub clauses: &'static str,
    pub terms: &'static str,
    pub begin_date: &'static str,
    pub due_date: &'static str,
    pub role_player: &'static str,
    pub operation: &'static str,
    pub on_breach: &'static str,
    /// `right`, `obligation`, `prohibition`.
    pub clause_keywords: &'static [Keyword],
    /// `rolePlayer`, `operation`, `onBreach`, `terms`.
    pub clause_members: &'static [Keyword],
    /// Parenthesized calls allowed inside `terms`.
    pub term_calls: &'static [Keyword],
    /// Party roles, which are also the only referenceable identifiers.
    pub roles: &'static [&'static str],
    pub weekdays: &'static [&'static str],
    pub time_units: &'static [&'static str],
    pub operations: &'static [&'static str],
}

impl Vocabulary {
    pub const JABUTI: Vocabulary = Vocabulary {
        contract: "contract",
        variables: "variables",
        dates: "dates",
        parties: "parties",
        clauses: "clauses",
        terms: "terms",
        begin_date: "beginDate",
        due_date: "dueDate",
        role_player: "rolePlayer",
        operation: "operation",
        on_breach: "onBreach",
        clause_keywords: &[
            Keyword::new("right", ScopeKind::Field),
            Keyword::new("obligation", ScopeKind::Field),
            Keyword::new("prohibition", ScopeKind::Field),
        ],
        clause_members: &[
            Keyword::new("rolePlayer", ScopeKind::Property),
            Keyword::new("operation", ScopeKind::Property),
            Keyword::new("onBreach", ScopeKind::Function),
            Keyword::new("terms", ScopeKind::Field),
        ],
        term_calls: &[
            Keyword::new("WeekDaysInterval", ScopeKind::Function),
            Keyword::new("TimeInterval", ScopeKind::Function),
            Keyword::new("MaxNumberOfOperation", ScopeKind::Function),
            Keyword::new("MessageContent", ScopeKind::Function),
            Keyword::new("Timeout", ScopeKind::Function),
        ],
        roles: &["application", "process"],
        weekdays: &[
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
        time_units: &["Second", "Hour", "Minute", "Day", "Week", "Month"],
        operations: &["push", "poll", "read", "write", "request", "response"],
    };

    pub fn is_role(&self, word: &str) -> bool {
        self.roles.contains(&word)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::JABUTI
    }
}
