pub(crate) mod fmt;
pub(crate) mod query;

use std::path::Path;

use crate::error::CliError;

pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
