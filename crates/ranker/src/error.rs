//! Error types for ranking.

use thiserror::Error;

/// An invalid ranking query.
///
/// Every variant is caller misuse; none of them touch shared state, so the
/// matrix stays usable for other queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error("Invalid query: index {index} is out of bounds for {len} rows")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid query: k must be at least 1")]
    ZeroK,

    #[error("Invalid query: vector has {found} dimensions but the matrix has {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl RankError {
    /// Every ranking error is an invalid query; kept as a method so callers
    /// can classify without matching on variants.
    pub fn is_invalid_query(&self) -> bool {
        matches!(
            self,
            RankError::IndexOutOfBounds { .. } | RankError::ZeroK | RankError::DimensionMismatch { .. }
        )
    }
}
