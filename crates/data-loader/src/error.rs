//! Error types for the data-loader crate.
//!
//! Only structural problems are errors here. Bad values inside an otherwise
//! well-formed line (a garbled date, a non-numeric runtime) are degraded to
//! `None` by [`MovieRecord::from_raw`](crate::MovieRecord::from_raw) instead.

use thiserror::Error;

/// Errors that can occur while loading a catalog file
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// Expected number of fields in a line doesn't match actual
    #[error("Expected {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },

    /// JSON catalog was not an array of movie objects
    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
