mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Environment variable consulted for the log filter when `--log-level` is absent.
const LOG_ENV: &str = "JABUTI_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Jabuti contract language toolchain.
#[derive(Parser)]
#[command(name = "jabuti", version, about = "Jabuti contract language toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log filter written to stderr, e.g. `debug` or `jabuti_lsp=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// A cursor in a file. Lines and columns are 1-based.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct CursorArgs {
    /// Path to the .jabuti source file
    pub file: PathBuf,
    /// Line number (1-based)
    #[arg(long)]
    pub line: u32,
    /// Column number (1-based)
    #[arg(long)]
    pub column: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Language Server Protocol server over stdio
    Lsp,

    /// Rewrite .jabuti files in canonical format
    Fmt {
        /// Files to format
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// List files that are not formatted instead of rewriting them
        #[arg(long)]
        check: bool,
    },

    /// Print the outline of a .jabuti file
    Outline {
        /// Path to the .jabuti source file
        file: PathBuf,
    },

    /// List completion suggestions at a cursor position
    Complete(CursorArgs),

    /// Show keyword documentation at a cursor position
    Hover(CursorArgs),

    /// Locate the declaration of the party role at a cursor position
    Definition(CursorArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Lsp => jabuti_lsp::run().map_err(CliError::from),
        Commands::Fmt { files, check } => {
            commands::fmt::cmd_fmt(&files, check, cli.output, cli.quiet)
        }
        Commands::Outline { file } => commands::query::cmd_outline(&file, cli.output),
        Commands::Complete(cursor) => commands::query::cmd_complete(&cursor, cli.output),
        Commands::Hover(cursor) => commands::query::cmd_hover(&cursor, cli.output),
        Commands::Definition(cursor) => commands::query::cmd_definition(&cursor, cli.output),
    };

    if let Err(e) = result {
        report_error(&e.to_string(), cli.output, cli.quiet);
        process::exit(1);
    }
}

/// Install the stderr subscriber. stdout is reserved for command output and
/// for the LSP transport.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
