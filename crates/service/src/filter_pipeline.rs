//! The FilterPipeline chains post-rank filters.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use ranker::ScoredIndex;
use tracing::debug;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumRatingFilter::new(6.5, 100))
///     .add_filter(RecencyFilter::new(10));
///
/// let picks = service.recommend_filtered("Alien", 10, &pipeline)?;
/// ```
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter names in application order
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence; the first failure stops the chain.
    pub fn apply(&self, candidates: Vec<ScoredIndex>, context: &FilterContext<'_>) -> Result<Vec<ScoredIndex>> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, context)?;
            debug!("Filter {} kept {} of {} candidates", filter.name(), current.len(), before);
        }
        Ok(current)
    }
}
