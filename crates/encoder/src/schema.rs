//! Fixed feature schema.
//!
//! The field order of every feature vector is fixed here, once:
//! genres, keywords, cast, companies, then the numeric block. Field counts
//! are associated consts, so per-field bookkeeping uses arrays sized at
//! compile time rather than maps keyed by field name.

use chrono::Datelike;
use data_loader::MovieRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Delimiter-separated categorical fields, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoricalField {
    Genres,
    Keywords,
    Cast,
    Companies,
}

impl CategoricalField {
    pub const COUNT: usize = 4;

    pub const ALL: [CategoricalField; Self::COUNT] = [
        CategoricalField::Genres,
        CategoricalField::Keywords,
        CategoricalField::Cast,
        CategoricalField::Companies,
    ];

    /// Position of this field in [`Self::ALL`]
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CategoricalField::Genres => "genres",
            CategoricalField::Keywords => "keywords",
            CategoricalField::Cast => "cast",
            CategoricalField::Companies => "companies",
        }
    }

    /// The raw, still-delimited value of this field
    pub fn value(self, record: &MovieRecord) -> &str {
        match self {
            CategoricalField::Genres => &record.genres,
            CategoricalField::Keywords => &record.keywords,
            CategoricalField::Cast => &record.cast,
            CategoricalField::Companies => &record.companies,
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric attributes blended into the vector, in vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericField {
    Popularity,
    Runtime,
    VoteCount,
    VoteAverage,
    /// Fractional year derived from the release date
    ReleaseYear,
}

impl NumericField {
    pub const COUNT: usize = 5;

    pub const ALL: [NumericField; Self::COUNT] = [
        NumericField::Popularity,
        NumericField::Runtime,
        NumericField::VoteCount,
        NumericField::VoteAverage,
        NumericField::ReleaseYear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::Popularity => "popularity",
            NumericField::Runtime => "runtime",
            NumericField::VoteCount => "vote_count",
            NumericField::VoteAverage => "vote_average",
            NumericField::ReleaseYear => "release_year",
        }
    }

    /// Raw value of this attribute, `None` when missing
    pub fn value(self, record: &MovieRecord) -> Option<f32> {
        match self {
            NumericField::Popularity => record.popularity,
            NumericField::Runtime => record.runtime,
            NumericField::VoteCount => record.vote_count.map(|c| c as f32),
            NumericField::VoteAverage => record.vote_average,
            NumericField::ReleaseYear => record
                .release_date
                .map(|d| d.year() as f32 + d.ordinal0() as f32 / 366.0),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A contiguous run of dimensions owned by one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSpan {
    pub offset: usize,
    pub len: usize,
}

impl FieldSpan {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn contains(&self, dim: usize) -> bool {
        self.range().contains(&dim)
    }
}

/// Where each field lives inside a feature vector.
///
/// Fixed for the lifetime of one encoded catalog: it depends on the
/// vocabulary learned from the whole corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    categorical: [FieldSpan; CategoricalField::COUNT],
    numeric: FieldSpan,
    dim: usize,
}

impl FeatureLayout {
    /// Lay fields out back to back in schema order.
    pub fn new(vocab_sizes: [usize; CategoricalField::COUNT], numeric_len: usize) -> Self {
        let mut offset = 0;
        let mut categorical = [FieldSpan::default(); CategoricalField::COUNT];

        for field in CategoricalField::ALL {
            let len = vocab_sizes[field.position()];
            categorical[field.position()] = FieldSpan { offset, len };
            offset += len;
        }

        let numeric = FieldSpan {
            offset,
            len: numeric_len,
        };

        Self {
            categorical,
            numeric,
            dim: offset + numeric_len,
        }
    }

    pub fn span(&self, field: CategoricalField) -> FieldSpan {
        self.categorical[field.position()]
    }

    pub fn numeric_span(&self) -> FieldSpan {
        self.numeric
    }

    /// Total dimensionality
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Which categorical field owns a dimension, if any
    pub fn field_of(&self, dim: usize) -> Option<CategoricalField> {
        CategoricalField::ALL
            .into_iter()
            .find(|field| self.span(*field).contains(dim))
    }
}
