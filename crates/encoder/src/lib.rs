//! Feature encoding for content-based similarity.
//!
//! This crate provides:
//! - Tokenizer trait and the default delimiter tokenizer
//! - Per-field vocabularies with smoothed IDF
//! - Catalog-wide numeric scaling
//! - FeatureEncoder, which turns a catalog into a FeatureMatrix
//!
//! ## Architecture
//! Every record becomes one sparse, unit-length vector laid out in a fixed
//! order: genres | keywords | cast | companies | numeric. The layout is
//! learned from the whole catalog, so a matrix is always built in one pass
//! and never patched.
//!
//! ## Example Usage
//! ```ignore
//! use encoder::{EncoderConfig, FeatureEncoder};
//!
//! let encoder = FeatureEncoder::new(EncoderConfig::default());
//! let matrix = encoder.encode(catalog.records())?;
//! assert_eq!(matrix.len(), catalog.len());
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod numeric;
pub mod schema;
pub mod tokenizer;
pub mod traits;
pub mod vocabulary;

// Re-export main types
pub use config::{EncoderConfig, FieldConfig, FieldPolicy, NumericConfig, ScalingMode};
pub use encoder::FeatureEncoder;
pub use error::EncodeError;
pub use matrix::{FeatureMatrix, FeatureVector};
pub use numeric::NumericScaler;
pub use schema::{CategoricalField, FeatureLayout, FieldSpan, NumericField};
pub use tokenizer::DelimitedTokenizer;
pub use traits::{Tokenizer, Tokens};
pub use vocabulary::Vocabulary;
