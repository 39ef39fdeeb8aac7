//! Filter to ensure a minimum audience rating.
//!
//! Removes movies with a low vote average or too few votes to trust it.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use ranker::ScoredIndex;

/// Removes candidates below quality thresholds.
///
/// A candidate without vote data never passes.
pub struct MinimumRatingFilter {
    min_rating: f32,
    min_votes: u32,
}

impl MinimumRatingFilter {
    /// # Arguments
    /// * `min_rating` - Minimum vote average (the catalog scale is 0-10)
    /// * `min_votes` - Minimum vote count
    pub fn new(min_rating: f32, min_votes: u32) -> Self {
        Self {
            min_rating,
            min_votes,
        }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(&self, candidates: Vec<ScoredIndex>, context: &FilterContext<'_>) -> Result<Vec<ScoredIndex>> {
        let mut filtered = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let movie = context.record(candidate.index)?;
            let passes = match (movie.vote_average, movie.vote_count) {
                (Some(average), Some(count)) => average >= self.min_rating && count >= self.min_votes,
                _ => false,
            };
            if passes {
                filtered.push(candidate);
            }
        }
        Ok(filtered)
    }
}
