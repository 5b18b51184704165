//! Jabuti Language Server Protocol implementation.
//!
//! Serves outline, completion, hover, go-to-definition and formatting for
//! `.jabuti` contracts over stdio. Every request re-analyzes the current
//! document text with `jabuti-core`; this crate only converts between
//! protocol types and engine results. Started by `jabuti lsp`.

pub mod completion;
pub mod document;
pub mod error;
pub mod formatting;
pub mod hover;
pub mod navigation;
pub mod server;

pub use error::ServerError;

/// Run the LSP server over stdio. This is the public entry point
/// called by `jabuti lsp`.
pub fn run() -> Result<(), ServerError> {
    server::run()
}
