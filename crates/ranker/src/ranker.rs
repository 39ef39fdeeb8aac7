//! Similarity Ranker - exhaustive top-K over a feature matrix
//!
//! ## Algorithm
//! 1. Score every row except the query's own against the query vector
//! 2. Partition out the best `k` with `select_nth_unstable_by`
//! 3. Sort those `k` by score descending, then index ascending
//!
//! Scoring is embarrassingly parallel, so large catalogs go through rayon.
//! Small ones are scored inline: the thread-pool hop costs more than the
//! work. Both paths produce the same list.

use crate::error::RankError;
use crate::similarity::cosine_similarity;
use encoder::{FeatureMatrix, FeatureVector};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Catalogs with fewer rows than this are scored on the calling thread
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2_048;

/// A candidate row and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

impl ScoredIndex {
    pub fn new(index: usize, score: f32) -> Self {
        Self { index, score }
    }
}

/// Ranks catalog rows by cosine similarity to a query row.
///
/// Stateless apart from tuning; one ranker can serve any number of matrices
/// and threads.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRanker {
    parallel_threshold: usize,
}

impl SimilarityRanker {
    pub fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Configure the row count at which scoring switches to rayon
    /// (default: 2048). `0` always goes parallel.
    pub fn with_parallel_threshold(mut self, rows: usize) -> Self {
        self.parallel_threshold = rows;
        self
    }

    /// Rank the query row against every other row of its own matrix.
    pub fn rank_index(
        &self,
        matrix: &FeatureMatrix,
        query_index: usize,
        k: usize,
    ) -> Result<Vec<ScoredIndex>, RankError> {
        let query = matrix.row(query_index).ok_or(RankError::IndexOutOfBounds {
            index: query_index,
            len: matrix.len(),
        })?;
        self.rank(query, matrix, query_index, k)
    }

    /// Top `k` rows by cosine similarity to `query`, never including
    /// `query_index`.
    ///
    /// Returns `min(k, matrix.len() - 1)` entries ordered by score
    /// descending; equal scores keep catalog order.
    #[instrument(skip(self, query, matrix), fields(rows = matrix.len()))]
    pub fn rank(
        &self,
        query: &FeatureVector,
        matrix: &FeatureMatrix,
        query_index: usize,
        k: usize,
    ) -> Result<Vec<ScoredIndex>, RankError> {
        if k == 0 {
            return Err(RankError::ZeroK);
        }
        if query_index >= matrix.len() {
            return Err(RankError::IndexOutOfBounds {
                index: query_index,
                len: matrix.len(),
            });
        }
        if query.dim() != matrix.dim() {
            return Err(RankError::DimensionMismatch {
                expected: matrix.dim(),
                found: query.dim(),
            });
        }

        let score_row = |(index, row): (usize, &FeatureVector)| {
            ScoredIndex::new(index, cosine_similarity(query, row))
        };

        let mut scored: Vec<ScoredIndex> = if matrix.len() >= self.parallel_threshold {
            matrix
                .rows()
                .par_iter()
                .enumerate()
                .filter(|(index, _)| *index != query_index)
                .map(score_row)
                .collect()
        } else {
            matrix
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != query_index)
                .map(score_row)
                .collect()
        };

        select_top_k(&mut scored, k);

        debug!(
            "Ranked {} candidates for row {}, top score {:?}",
            scored.len(),
            query_index,
            scored.first().map(|s| s.score)
        );
        Ok(scored)
    }
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank with the default [`SimilarityRanker`].
pub fn rank(
    query: &FeatureVector,
    matrix: &FeatureMatrix,
    query_index: usize,
    k: usize,
) -> Result<Vec<ScoredIndex>, RankError> {
    SimilarityRanker::new().rank(query, matrix, query_index, k)
}

/// Score descending, then index ascending. `total_cmp` keeps this a total
/// order even if a NaN slips through.
pub fn ranking_order(a: &ScoredIndex, b: &ScoredIndex) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.index.cmp(&b.index))
}

/// Keep the best `k` candidates, sorted by [`ranking_order`].
fn select_top_k(candidates: &mut Vec<ScoredIndex>, k: usize) {
    if candidates.len() > k {
        candidates.select_nth_unstable_by(k - 1, ranking_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(ranking_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;
    use encoder::{EncoderConfig, FeatureEncoder};

    fn matrix(records: &[MovieRecord]) -> FeatureMatrix {
        FeatureEncoder::new(EncoderConfig::default().without_numeric())
            .encode(records)
            .unwrap()
    }

    fn catalog() -> Vec<MovieRecord> {
        vec![
            MovieRecord::new("Alien").with_genres("Horror|Science Fiction"),
            MovieRecord::new("Aliens").with_genres("Action|Horror|Science Fiction"),
            MovieRecord::new("Heat").with_genres("Crime|Drama|Thriller"),
            MovieRecord::new("Prometheus").with_genres("Science Fiction|Mystery"),
            MovieRecord::new("Toy Story").with_genres("Animation|Comedy|Family"),
        ]
    }

    #[test]
    fn test_excludes_query_and_orders_by_score() {
        let m = matrix(&catalog());
        let ranked = SimilarityRanker::new().rank_index(&m, 0, 10).unwrap();

        assert_eq!(ranked.len(), 4);
        assert!(ranked.iter().all(|s| s.index != 0));
        assert_eq!(ranked[0].index, 1);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_truncates_to_k() {
        let m = matrix(&catalog());
        let ranked = SimilarityRanker::new().rank_index(&m, 0, 2).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 3);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let records = vec![
            MovieRecord::new("Query").with_genres("Drama"),
            MovieRecord::new("Unrelated A").with_genres("Comedy"),
            MovieRecord::new("Twin B").with_genres("Drama"),
            MovieRecord::new("Unrelated C").with_genres("Western"),
            MovieRecord::new("Twin D").with_genres("Drama"),
        ];
        let m = matrix(&records);
        let ranked = SimilarityRanker::new().rank_index(&m, 0, 4).unwrap();
        let order: Vec<usize> = ranked.iter().map(|s| s.index).collect();

        assert_eq!(order, vec![2, 4, 1, 3]);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let m = matrix(&catalog());
        let sequential = SimilarityRanker::new()
            .with_parallel_threshold(usize::MAX)
            .rank_index(&m, 2, 3)
            .unwrap();
        let parallel = SimilarityRanker::new()
            .with_parallel_threshold(0)
            .rank_index(&m, 2, 3)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_single_row_catalog_yields_nothing() {
        let m = matrix(&[MovieRecord::new("Solo").with_genres("Drama")]);
        let ranked = SimilarityRanker::new().rank_index(&m, 0, 5).unwrap();

        assert!(ranked.is_empty());
    }

    #[test]
    fn test_invalid_queries() {
        let m = matrix(&catalog());
        let ranker = SimilarityRanker::new();

        assert_eq!(ranker.rank_index(&m, 0, 0), Err(RankError::ZeroK));
        assert!(RankError::ZeroK.is_invalid_query());
        assert_eq!(
            ranker.rank_index(&m, 9, 3),
            Err(RankError::IndexOutOfBounds { index: 9, len: 5 })
        );

        let wrong_dim = FeatureVector::zeros(m.dim() + 1);
        assert_eq!(
            ranker.rank(&wrong_dim, &m, 0, 3),
            Err(RankError::DimensionMismatch {
                expected: m.dim(),
                found: m.dim() + 1,
            })
        );
    }

    #[test]
    fn test_free_rank_matches_ranker() {
        let m = matrix(&catalog());
        let query = m.row(1).unwrap();

        assert_eq!(
            rank(query, &m, 1, 3).unwrap(),
            SimilarityRanker::new().rank_index(&m, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_ranking_order() {
        let mut items = vec![
            ScoredIndex::new(3, 0.5),
            ScoredIndex::new(1, 0.9),
            ScoredIndex::new(0, 0.5),
            ScoredIndex::new(2, -0.1),
        ];
        items.sort_by(ranking_order);
        let order: Vec<usize> = items.iter().map(|s| s.index).collect();

        assert_eq!(order, vec![1, 0, 3, 2]);
    }
}
