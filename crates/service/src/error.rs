//! Error types for the recommendation service.

use encoder::EncodeError;
use ranker::RankError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// No catalog record carries this exact title
    #[error("Title not found: {title}")]
    TitleNotFound { title: String },

    /// Building a snapshot failed; the previous snapshot (if any) is kept
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Rank(#[from] RankError),

    /// A post-rank filter failed
    #[error(transparent)]
    Filter(#[from] anyhow::Error),
}

impl ServiceError {
    /// Errors caused by the query rather than the catalog
    pub fn is_invalid_query(&self) -> bool {
        match self {
            ServiceError::TitleNotFound { .. } => true,
            ServiceError::Rank(err) => err.is_invalid_query(),
            ServiceError::Encode(_) | ServiceError::Filter(_) => false,
        }
    }
}
