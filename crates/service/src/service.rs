//! # Recommendation Service
//!
//! Title in, similar titles out:
//! 1. Resolve the title to a catalog index (exact, case-sensitive)
//! 2. Rank every other row by cosine similarity
//! 3. Optionally run post-rank filters
//! 4. Map indices back to titles
//!
//! The service owns its catalog snapshot behind `RwLock<Arc<_>>`. Queries
//! clone the `Arc` and release the lock before ranking, so a reload never
//! waits on slow queries and a query never sees a half-swapped catalog.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use data_loader::{Catalog, MovieRecord};
use encoder::{CategoricalField, EncoderConfig, FeatureEncoder};
use ranker::{cosine_similarity, RankError, ScoredIndex, SimilarityRanker};
use tracing::{debug, info, instrument};

use crate::error::ServiceError;
use crate::filter_pipeline::FilterPipeline;
use crate::snapshot::CatalogSnapshot;
use crate::traits::FilterContext;

/// Recommendations returned when the caller does not ask for a count
pub const DEFAULT_K: usize = 5;

/// One recommended movie
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Catalog index of the recommended movie
    pub index: usize,
    pub title: String,
    /// Cosine similarity to the query movie
    pub score: f32,
}

/// Why two movies are similar
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub query: String,
    pub candidate: String,
    pub score: f32,
    /// Tokens both movies share, per categorical field, sorted. Fields with
    /// nothing in common are omitted.
    pub shared: Vec<(CategoricalField, Vec<String>)>,
}

/// Content-based recommendations over one catalog.
///
/// Many services may coexist; each owns its own snapshot.
pub struct RecommendationService {
    encoder: FeatureEncoder,
    ranker: SimilarityRanker,
    snapshot: RwLock<Arc<CatalogSnapshot>>,
}

impl RecommendationService {
    /// Encode `catalog` and serve it.
    ///
    /// # Returns
    /// * `Err(ServiceError::Encode)` - empty catalog, or a field with
    ///   `FieldPolicy::Fail` was malformed
    pub fn new(catalog: Catalog, config: EncoderConfig) -> Result<Self, ServiceError> {
        Self::with_encoder(catalog, FeatureEncoder::new(config))
    }

    /// Build from records with the default encoder configuration.
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self, ServiceError> {
        Self::new(Catalog::from_records(records), EncoderConfig::default())
    }

    /// Serve `catalog` with a custom encoder (e.g. a replaced tokenizer).
    pub fn with_encoder(catalog: Catalog, encoder: FeatureEncoder) -> Result<Self, ServiceError> {
        let snapshot = CatalogSnapshot::build(catalog, &encoder)?;
        Ok(Self {
            encoder,
            ranker: SimilarityRanker::new(),
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Replace the ranker (builder pattern).
    pub fn with_ranker(mut self, ranker: SimilarityRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// The snapshot queries currently run against.
    ///
    /// Holding the returned `Arc` pins that snapshot even across a reload.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Titles of the `k` movies most similar to `title`, most similar first.
    ///
    /// Returns `min(k, catalog size - 1)` titles; the query itself is never
    /// among them.
    pub fn recommend(&self, title: &str, k: usize) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .recommend_scored(title, k)?
            .into_iter()
            .map(|rec| rec.title)
            .collect())
    }

    /// Like [`recommend`](Self::recommend), keeping indices and scores.
    #[instrument(skip(self))]
    pub fn recommend_scored(&self, title: &str, k: usize) -> Result<Vec<Recommendation>, ServiceError> {
        let start = Instant::now();
        let snapshot = self.snapshot();
        let query_index = resolve(&snapshot, title)?;

        let ranked = self.ranker.rank_index(snapshot.matrix(), query_index, k)?;
        let recommendations = to_recommendations(&snapshot, ranked);

        debug!(
            "Recommended {} movies for '{}' in {:.2?}",
            recommendations.len(),
            title,
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Rank every candidate, drop what `pipeline` rejects, keep the best `k`.
    ///
    /// Filters run before truncation, so `k` results come back whenever
    /// enough candidates survive.
    #[instrument(skip(self, pipeline), fields(filters = pipeline.len()))]
    pub fn recommend_filtered(
        &self,
        title: &str,
        k: usize,
        pipeline: &FilterPipeline,
    ) -> Result<Vec<Recommendation>, ServiceError> {
        let snapshot = self.snapshot();
        let query_index = resolve(&snapshot, title)?;
        if k == 0 {
            return Err(RankError::ZeroK.into());
        }

        let ranked = self
            .ranker
            .rank_index(snapshot.matrix(), query_index, snapshot.len())?;
        let context = FilterContext::new(snapshot.catalog(), query_index);
        let mut kept = pipeline.apply(ranked, &context)?;
        kept.truncate(k);

        debug!("{} candidates survived filtering for '{}'", kept.len(), title);
        Ok(to_recommendations(&snapshot, kept))
    }

    /// Titles containing `query`, case-insensitively; exact matches first.
    pub fn search(&self, query: &str) -> Vec<String> {
        let snapshot = self.snapshot();
        snapshot
            .catalog()
            .search(query)
            .into_iter()
            .filter_map(|idx| snapshot.catalog().get(idx))
            .map(|record| record.title.clone())
            .collect()
    }

    /// Like [`search`](Self::search), returning catalog indices so
    /// duplicate titles stay distinguishable.
    pub fn search_indices(&self, query: &str) -> Vec<usize> {
        self.snapshot().catalog().search(query)
    }

    /// Similarity of two catalog titles and the tokens they share.
    ///
    /// Both titles resolve to their first occurrence; use
    /// [`explain_indices`](Self::explain_indices) for a specific duplicate.
    pub fn explain(&self, query_title: &str, candidate_title: &str) -> Result<Explanation, ServiceError> {
        let snapshot = self.snapshot();
        let query_index = resolve(&snapshot, query_title)?;
        let candidate_index = resolve(&snapshot, candidate_title)?;
        Ok(self.explain_in(&snapshot, query_index, candidate_index))
    }

    /// Like [`explain`](Self::explain), for two catalog indices such as a
    /// query and a [`Recommendation::index`].
    ///
    /// # Returns
    /// * `Err(ServiceError::Rank(RankError::IndexOutOfBounds))` - either index
    ///   is past the end of the catalog
    pub fn explain_indices(&self, query_index: usize, candidate_index: usize) -> Result<Explanation, ServiceError> {
        let snapshot = self.snapshot();
        for index in [query_index, candidate_index] {
            if index >= snapshot.len() {
                return Err(RankError::IndexOutOfBounds {
                    index,
                    len: snapshot.len(),
                }
                .into());
            }
        }
        Ok(self.explain_in(&snapshot, query_index, candidate_index))
    }

    /// Catalog index of the first movie titled `title`.
    pub fn resolve(&self, title: &str) -> Result<usize, ServiceError> {
        resolve(&self.snapshot(), title)
    }

    fn explain_in(&self, snapshot: &CatalogSnapshot, query_index: usize, candidate_index: usize) -> Explanation {
        // Callers check both indices against this snapshot.
        let query = &snapshot.catalog().records()[query_index];
        let candidate = &snapshot.catalog().records()[candidate_index];
        let score = cosine_similarity(
            &snapshot.matrix().rows()[query_index],
            &snapshot.matrix().rows()[candidate_index],
        );

        let shared = CategoricalField::ALL
            .into_iter()
            .filter_map(|field| {
                let ours: BTreeSet<String> = self.encoder.tokens(query, field).into_iter().collect();
                let common: Vec<String> = self
                    .encoder
                    .tokens(candidate, field)
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .intersection(&ours)
                    .cloned()
                    .collect();
                (!common.is_empty()).then_some((field, common))
            })
            .collect();

        Explanation {
            query: query.title.clone(),
            candidate: candidate.title.clone(),
            score,
            shared,
        }
    }

    /// Re-encode a new catalog and swap it in.
    ///
    /// The new snapshot is built completely before the swap; on error the
    /// current snapshot keeps serving.
    pub fn reload(&self, catalog: Catalog) -> Result<(), ServiceError> {
        let snapshot = Arc::new(CatalogSnapshot::build(catalog, &self.encoder)?);
        let movies = snapshot.len();

        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot;
        drop(guard);

        info!("Reloaded catalog: {} movies", movies);
        Ok(())
    }
}

fn resolve(snapshot: &CatalogSnapshot, title: &str) -> Result<usize, ServiceError> {
    snapshot
        .catalog()
        .find_title(title)
        .ok_or_else(|| ServiceError::TitleNotFound {
            title: title.to_string(),
        })
}

fn to_recommendations(snapshot: &CatalogSnapshot, ranked: Vec<ScoredIndex>) -> Vec<Recommendation> {
    ranked
        .into_iter()
        .filter_map(|hit| {
            snapshot.catalog().get(hit.index).map(|record| Recommendation {
                index: hit.index,
                title: record.title.clone(),
                score: hit.score,
            })
        })
        .collect()
}
