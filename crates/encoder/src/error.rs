//! Error types for feature encoding.

use thiserror::Error;

/// Errors that abort an encode.
///
/// Encoding is all-or-nothing: if any record fails, no matrix is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Zero records were supplied, so no vocabulary can be built
    #[error("Cannot encode an empty catalog")]
    EmptyCatalog,

    /// A field configured with `FieldPolicy::Fail` was malformed
    #[error("Cannot encode {field} of record {index} ({title}): {reason}")]
    Encoding {
        index: usize,
        title: String,
        field: String,
        reason: String,
    },
}
