use std::path::PathBuf;

use jabuti_core::format_document;
use serde::Serialize;
use tracing::{debug, info};

use super::read_source;
use crate::error::CliError;
use crate::OutputFormat;

#[derive(Serialize)]
struct FileReport {
    path: String,
    changed: bool,
}

/// Format `files` in place, or with `check` only report the ones that
/// would change.
pub(crate) fn cmd_fmt(
    files: &[PathBuf],
    check: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let source = read_source(path)?;
        let formatted = format_document(&source);
        let changed = formatted != source;
        debug!(path = %path.display(), changed, "checked formatting");

        if changed && !check {
            std::fs::write(path, &formatted).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "formatted");
        }
        reports.push(FileReport {
            path: path.display().to_string(),
            changed,
        });
    }

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in reports.iter().filter(|r| r.changed) {
                if check {
                    println!("{}", report.path);
                } else if !quiet {
                    println!("formatted {}", report.path);
                }
            }
        }
    }

    let unformatted = reports.iter().filter(|r| r.changed).count();
    if check && unformatted > 0 {
        return Err(CliError::Unformatted(unformatted));
    }
    Ok(())
}
