//! Filter for release-era similarity.
//!
//! Keeps candidates released within a window around the query movie's
//! release year.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use ranker::ScoredIndex;

/// Filters candidates by distance in release year from the query movie.
///
/// ## Algorithm
/// 1. Use the query movie's release year as the center point
/// 2. Keep movies within +/- year_tolerance years
/// 3. If the query has no release date, keep all movies
/// 4. Candidates without a release date are kept
pub struct RecencyFilter {
    year_tolerance: u16,
}

impl RecencyFilter {
    /// # Arguments
    /// * `year_tolerance` - How many years +/- from the query's release year
    pub fn new(year_tolerance: u16) -> Self {
        Self { year_tolerance }
    }
}

impl Filter for RecencyFilter {
    fn name(&self) -> &str {
        "RecencyFilter"
    }

    fn apply(&self, candidates: Vec<ScoredIndex>, context: &FilterContext<'_>) -> Result<Vec<ScoredIndex>> {
        let Some(center) = context.query()?.release_year() else {
            return Ok(candidates);
        };
        let tolerance = i32::from(self.year_tolerance);

        let mut filtered = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let keep = match context.record(candidate.index)?.release_year() {
                Some(year) => (year - center).abs() <= tolerance,
                None => true,
            };
            if keep {
                filtered.push(candidate);
            }
        }
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::{Catalog, MovieRecord};

    fn released(title: &str, year: i32) -> MovieRecord {
        MovieRecord::new(title).with_release_date(NaiveDate::from_ymd_opt(year, 6, 1).unwrap())
    }

    fn candidates() -> Vec<ScoredIndex> {
        vec![
            ScoredIndex::new(1, 0.9),
            ScoredIndex::new(2, 0.8),
            ScoredIndex::new(3, 0.7),
            ScoredIndex::new(4, 0.6),
        ]
    }

    #[test]
    fn test_recency_filter() {
        let catalog = Catalog::from_records(vec![
            released("Era Query", 2000),
            released("Old Movie", 1980),
            released("Era Movie", 2008),
            released("Recent Movie", 2020),
            MovieRecord::new("Undated Movie"),
        ]);

        let filter = RecencyFilter::new(10);
        let filtered = filter.apply(candidates(), &FilterContext::new(&catalog, 0)).unwrap();
        let kept: Vec<usize> = filtered.iter().map(|c| c.index).collect();

        assert_eq!(kept, vec![2, 4]);
    }

    #[test]
    fn test_recency_filter_undated_query() {
        let catalog = Catalog::from_records(vec![
            MovieRecord::new("Undated Query"),
            released("Old Movie", 1980),
            released("Era Movie", 2008),
            released("Recent Movie", 2020),
            MovieRecord::new("Undated Movie"),
        ]);

        let filter = RecencyFilter::new(10);
        let filtered = filter.apply(candidates(), &FilterContext::new(&catalog, 0)).unwrap();

        assert_eq!(filtered.len(), 4);
    }
}
