//! Core traits for the feature encoder.
//!
//! The encoder owns one [`Tokenizer`] per categorical field. The default is
//! [`DelimitedTokenizer`](crate::tokenizer::DelimitedTokenizer); callers can
//! plug in their own through
//! [`FeatureEncoder::with_tokenizer`](crate::FeatureEncoder::with_tokenizer).

/// Result of tokenizing one field of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Tokens in source order; duplicates are kept so term frequency can
    /// count them
    pub terms: Vec<String>,
    /// Segments that were empty between two delimiters (e.g. `Action||Drama`)
    pub empty_segments: usize,
}

impl Tokens {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Splits a raw categorical field into tokens.
///
/// ## Design Note
/// - `Send + Sync` because records are tokenized in parallel with rayon
/// - Must be deterministic: the same input always yields the same tokens
pub trait Tokenizer: Send + Sync {
    /// Returns the name of this tokenizer (for logging/debugging)
    fn name(&self) -> &str;

    /// Tokenize one raw field value.
    ///
    /// An empty or all-whitespace value yields no tokens and no empty
    /// segments; it is simply a field with nothing in it.
    fn tokenize(&self, raw: &str) -> Tokens;
}
