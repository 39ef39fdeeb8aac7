//! The Feature Encoder: catalog records in, feature matrix out.
//!
//! ## Algorithm
//! 1. Tokenize every categorical field of every record (parallel)
//! 2. Fit one vocabulary per field over the whole catalog
//! 3. Fit the numeric scaler over the whole catalog
//! 4. For each record (parallel, order-preserving):
//!    - per field: `tf * idf` for each token, L2-normalize, times field weight
//!    - numeric block: scaled values (bounded by the scaler) times
//!      `numeric.weight / (bound * sqrt(COUNT))`, so its norm never exceeds
//!      `numeric.weight`
//!    - concatenate in schema order and L2-normalize the row
//!
//! Steps 2 and 3 need the full corpus, which is why there is no incremental
//! update: a changed catalog is re-encoded from scratch.

use crate::config::{EncoderConfig, FieldPolicy};
use crate::error::EncodeError;
use crate::matrix::{FeatureMatrix, FeatureVector};
use crate::numeric::{NumericRow, NumericScaler};
use crate::schema::{CategoricalField, FeatureLayout, NumericField};
use crate::tokenizer::DelimitedTokenizer;
use crate::traits::Tokenizer;
use crate::vocabulary::Vocabulary;
use data_loader::MovieRecord;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Tokens of every categorical field of one record, in schema order
type RecordTokens = [Vec<String>; CategoricalField::COUNT];

/// Turns catalog records into a [`FeatureMatrix`].
///
/// Cheap to clone: tokenizers are shared behind `Arc`.
#[derive(Clone)]
pub struct FeatureEncoder {
    config: EncoderConfig,
    tokenizers: [Arc<dyn Tokenizer>; CategoricalField::COUNT],
}

impl FeatureEncoder {
    /// Create an encoder with a [`DelimitedTokenizer`] per field.
    pub fn new(config: EncoderConfig) -> Self {
        let tokenizers = CategoricalField::ALL.map(|field| {
            Arc::new(DelimitedTokenizer::from_config(config.field(field))) as Arc<dyn Tokenizer>
        });
        Self { config, tokenizers }
    }

    /// Replace the tokenizer of one field (builder pattern).
    pub fn with_tokenizer(mut self, field: CategoricalField, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizers[field.position()] = Arc::new(tokenizer);
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Tokens the encoder sees for one field of one record.
    ///
    /// Malformed segments are dropped here regardless of policy; this is for
    /// explaining results, not for validation.
    pub fn tokens(&self, record: &MovieRecord, field: CategoricalField) -> Vec<String> {
        self.tokenizers[field.position()]
            .tokenize(field.value(record))
            .terms
    }

    /// Encode a whole catalog.
    ///
    /// # Returns
    /// * `Ok(FeatureMatrix)` - one row per record, in record order
    /// * `Err(EncodeError::EmptyCatalog)` - no records
    /// * `Err(EncodeError::Encoding)` - a field with `FieldPolicy::Fail` was malformed
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn encode(&self, records: &[MovieRecord]) -> Result<FeatureMatrix, EncodeError> {
        if records.is_empty() {
            return Err(EncodeError::EmptyCatalog);
        }
        let start = Instant::now();

        // Step 1: Tokenize
        let tokenized: Vec<RecordTokens> = records
            .par_iter()
            .enumerate()
            .map(|(idx, record)| self.tokenize_record(idx, record))
            .collect::<Result<_, _>>()?;

        // Step 2: Vocabularies
        let vocabularies: [Vocabulary; CategoricalField::COUNT] = std::array::from_fn(|pos| {
            Vocabulary::fit(tokenized.iter().map(|tokens| tokens[pos].as_slice()))
        });
        for field in CategoricalField::ALL {
            debug!(
                "Vocabulary for {}: {} terms",
                field,
                vocabularies[field.position()].len()
            );
        }

        // Step 3: Numeric scaling
        let numeric_rows: Vec<NumericRow> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| self.numeric_row(idx, record))
            .collect::<Result<_, _>>()?;
        let scaler = NumericScaler::fit(&numeric_rows, self.config.numeric.scaling);

        let numeric_len = if self.config.numeric.is_enabled() {
            NumericField::COUNT
        } else {
            0
        };
        let layout = FeatureLayout::new(vocabularies.each_ref().map(Vocabulary::len), numeric_len);

        // Step 4: Assemble rows
        let rows: Vec<FeatureVector> = tokenized
            .par_iter()
            .zip(numeric_rows.par_iter())
            .map(|(tokens, numeric)| self.build_row(tokens, numeric, &vocabularies, &scaler, &layout))
            .collect();

        info!(
            "Encoded {} movies into {} dimensions in {:?}",
            rows.len(),
            layout.dim(),
            start.elapsed()
        );

        Ok(FeatureMatrix::new(rows, layout, vocabularies, scaler))
    }

    /// Tokenize all categorical fields of one record, applying field policies.
    fn tokenize_record(&self, index: usize, record: &MovieRecord) -> Result<RecordTokens, EncodeError> {
        let mut out: RecordTokens = Default::default();

        for field in CategoricalField::ALL {
            let tokens = self.tokenizers[field.position()].tokenize(field.value(record));

            if tokens.empty_segments > 0 && self.config.field(field).policy == FieldPolicy::Fail {
                return Err(EncodeError::Encoding {
                    index,
                    title: record.title.clone(),
                    field: field.name().to_string(),
                    reason: format!(
                        "{} empty token(s) between delimiters",
                        tokens.empty_segments
                    ),
                });
            }
            out[field.position()] = tokens.terms;
        }
        Ok(out)
    }

    /// Extract numeric attributes, treating non-finite values per policy.
    fn numeric_row(&self, index: usize, record: &MovieRecord) -> Result<NumericRow, EncodeError> {
        let mut row: NumericRow = [None; NumericField::COUNT];

        for (col, field) in NumericField::ALL.into_iter().enumerate() {
            row[col] = match field.value(record) {
                Some(v) if v.is_finite() => Some(v),
                Some(v) => {
                    if self.config.numeric.policy == FieldPolicy::Fail {
                        return Err(EncodeError::Encoding {
                            index,
                            title: record.title.clone(),
                            field: field.name().to_string(),
                            reason: format!("non-finite value {v}"),
                        });
                    }
                    None
                }
                None => None,
            };
        }
        Ok(row)
    }

    /// Build one unit-length (or zero) row.
    fn build_row(
        &self,
        tokens: &RecordTokens,
        numeric: &NumericRow,
        vocabularies: &[Vocabulary; CategoricalField::COUNT],
        scaler: &NumericScaler,
        layout: &FeatureLayout,
    ) -> FeatureVector {
        let mut entries: Vec<(u32, f32)> = Vec::new();

        for field in CategoricalField::ALL {
            let weight = self.config.field(field).weight;
            let offset = layout.span(field).offset;
            let block = tfidf_block(&tokens[field.position()], &vocabularies[field.position()]);

            entries.extend(
                block
                    .into_iter()
                    .map(|(term, w)| ((offset + term as usize) as u32, w * weight)),
            );
        }

        let numeric_span = layout.numeric_span();
        if numeric_span.len > 0 {
            let per_value =
                self.config.numeric.weight / (scaler.bound() * (NumericField::COUNT as f32).sqrt());
            let scaled = scaler.transform(numeric);
            entries.extend(
                scaled
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(|(col, v)| ((numeric_span.offset + col) as u32, v * per_value)),
            );
        }

        FeatureVector::from_sparse(layout.dim(), entries).normalized()
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

/// TF-IDF weights for one field of one record, L2-normalized.
///
/// Returns `(term index, weight)` sorted by term index. Empty input gives an
/// empty block.
fn tfidf_block(tokens: &[String], vocabulary: &Vocabulary) -> Vec<(u32, f32)> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(term) = vocabulary.index_of(token) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    let total = tokens.len() as f32;
    let mut block: Vec<(u32, f32)> = counts
        .into_iter()
        .map(|(term, count)| {
            let tf = count as f32 / total;
            let idf = vocabulary.idf(term as usize).unwrap_or(0.0);
            (term, tf * idf)
        })
        .collect();

    let norm = block.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        block.iter_mut().for_each(|(_, w)| *w /= norm);
    }
    block
}
