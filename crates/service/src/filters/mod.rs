//! Filter implementations for the post-rank pipeline.

pub mod minimum_rating;
pub mod recency;

// Re-export for convenience
pub use minimum_rating::MinimumRatingFilter;
pub use recency::RecencyFilter;
