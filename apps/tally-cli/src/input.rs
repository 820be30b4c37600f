//! Reads sales documents from disk.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Reads and parses a JSON document.
///
/// Shape checks are left to `tally_core::analyze_value` so a well-formed
/// JSON file with the wrong layout reports the same errors as any other
/// caller would see.
pub fn read_document(path: &Path) -> CliResult<Value> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    debug!(?path, bytes = contents.len(), "Read sales document");

    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
