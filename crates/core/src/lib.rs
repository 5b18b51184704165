//! jabuti-core: structural text analysis for the Jabuti contract DSL.
//!
//! Every editor feature works on a raw text snapshot without a grammar,
//! using only keyword vocabulary, brace counting and position arithmetic.
//!
//! # Public API
//!
//! - [`build_scope_tree()`] -- outline of a document
//! - [`suggest()`] -- completion candidates at a cursor
//! - [`hover_at()`] -- keyword documentation at a cursor
//! - [`word_at()`] and [`find_definition()`] -- party role navigation
//! - [`format_document()`] / [`format_edits()`] -- canonical formatting
//!
//! All of them take an immutable [`Snapshot`] and, where keywords matter,
//! a [`Vocabulary`]. None of them fail: missing constructs yield empty
//! results.

pub mod completion;
pub mod context;
pub mod definition;
pub mod format;
pub mod hover;
pub mod scan;
pub mod scope;
pub mod segment;
pub mod snapshot;
pub mod snippet;
pub mod templates;
pub mod variables;
pub mod vocabulary;
pub mod word;

// ── Convenience re-exports: key types ────────────────────────────────

pub use completion::{CandidateKind, CompletionCandidate};
pub use context::CursorContext;
pub use format::FormatEdit;
pub use hover::HoverDoc;
pub use scan::Occurrence;
pub use scope::ScopeNode;
pub use snapshot::{Position, Snapshot};
pub use snippet::{Snippet, SnippetPart};
pub use templates::DateStamps;
pub use vocabulary::{Keyword, ScopeKind, Vocabulary};
pub use word::WordRange;

// ── Convenience re-exports: entry points ─────────────────────────────

pub use completion::suggest;
pub use context::resolve_context;
pub use definition::find_definition;
pub use format::{format_document, format_edits};
pub use hover::hover_at;
pub use scan::find_occurrences;
pub use scope::build_scope_tree;
pub use word::word_at;
