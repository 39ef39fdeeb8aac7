//! Core traits for post-rank filtering.
//!
//! Filters see candidates after similarity ranking and before truncation to
//! `k`, so a filter never shrinks the result below what the catalog allows.

use anyhow::{Context, Result};
use data_loader::{Catalog, MovieRecord};
use ranker::ScoredIndex;

/// What a filter may look at besides the candidates themselves.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub catalog: &'a Catalog,
    pub query_index: usize,
}

impl<'a> FilterContext<'a> {
    pub fn new(catalog: &'a Catalog, query_index: usize) -> Self {
        Self {
            catalog,
            query_index,
        }
    }

    /// The movie the recommendations are for
    pub fn query(&self) -> Result<&'a MovieRecord> {
        self.record(self.query_index)
    }

    /// Catalog record behind a candidate index
    pub fn record(&self, index: usize) -> Result<&'a MovieRecord> {
        self.catalog
            .get(index)
            .with_context(|| format!("Candidate {} is not in the catalog ({} records)", index, self.catalog.len()))
    }
}

/// Core trait for filtering ranked candidates.
///
/// `Send + Sync` so a pipeline can be shared across request threads.
/// Filters take ownership of the candidate list and must keep the relative
/// order of what they retain.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to ranked candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredIndex>)` - The retained candidates, still in rank order
    /// * `Err` - If filtering fails
    fn apply(&self, candidates: Vec<ScoredIndex>, context: &FilterContext<'_>) -> Result<Vec<ScoredIndex>>;
}
