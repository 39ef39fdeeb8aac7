//! # Ranker Crate
//!
//! Nearest-neighbour ranking over an encoded catalog.
//!
//! ## Components
//!
//! ### Cosine Similarity
//! `(a · b) / (‖a‖ ‖b‖)` over sparse feature vectors, defined as 0 when
//! either side is the zero vector.
//!
//! ### Similarity Ranker
//! Exhaustive top-K: every row is scored against the query, the query's own
//! row is never returned, and ties fall back to catalog order so the output
//! is identical run to run.
//!
//! ## Example Usage
//!
//! ```ignore
//! use ranker::SimilarityRanker;
//!
//! let matrix = encoder.encode(catalog.records())?;
//! let top = SimilarityRanker::new().rank_index(&matrix, query_index, 10)?;
//! for hit in top {
//!     println!("{} {:.3}", catalog.records()[hit.index].title, hit.score);
//! }
//! ```
//!
//! ## Performance
//!
//! Scoring is linear in the catalog size and in the non-zeros per row; the
//! top-K selection adds `O(n + k log k)`.

pub mod error;
pub mod ranker;
pub mod similarity;

// Re-export commonly used types
pub use error::RankError;
pub use ranker::{rank, ranking_order, ScoredIndex, SimilarityRanker, DEFAULT_PARALLEL_THRESHOLD};
pub use similarity::cosine_similarity;
