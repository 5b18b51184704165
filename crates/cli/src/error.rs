use std::path::PathBuf;

/// Failures reported by a `jabuti` subcommand. Each one exits with status 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("error reading file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error writing file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `fmt --check` found files that are not canonically formatted.
    #[error("{0} file(s) would be reformatted")]
    Unformatted(usize),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LSP server error: {0}")]
    Server(#[from] jabuti_lsp::ServerError),
}
