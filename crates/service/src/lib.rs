//! Service crate: the recommendation entry point.
//!
//! Owns a catalog snapshot (records plus their feature matrix) and answers
//! "movies like this one" queries against it. Post-rank filters narrow the
//! result by rating or release era.

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod service;
pub mod snapshot;
pub mod traits;

pub use error::ServiceError;
pub use filter_pipeline::FilterPipeline;
pub use filters::{MinimumRatingFilter, RecencyFilter};
pub use service::{Explanation, Recommendation, RecommendationService, DEFAULT_K};
pub use snapshot::CatalogSnapshot;
pub use traits::{Filter, FilterContext};
