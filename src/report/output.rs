// src/report/output.rs
// =============================================================================
// Writes the list of words that worked to disk.
//
// Format: a JSON array of strings, pretty-printed with 2-space indentation.
// The file is overwritten on every run.
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write results to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn write_results(path: &Path, words: &[String]) -> Result<(), ReportError> {
    // to_string_pretty indents with 2 spaces
    let json = serde_json::to_string_pretty(words)?;
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// Writes the results; if that fails, prints them to stdout first so a long
// run is never lost, then returns the error
pub fn persist(path: &Path, words: &[String]) -> Result<(), ReportError> {
    match write_results(path, words) {
        Ok(()) => {
            tracing::info!(path = %path.display(), count = words.len(), "results written");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to persist results, printing them instead");
            println!("{}", serde_json::to_string_pretty(words)?);
            Err(e)
        }
    }
}
