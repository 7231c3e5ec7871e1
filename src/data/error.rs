use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a [`Dataset`](super::model::Dataset) from a source file.
///
/// Every variant is fatal at startup; there is no partial load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("missing expected column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}: cannot parse {column} value '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),
}

/// A query that was rejected outright (as opposed to one with no results).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}
