//! Sparse feature vectors and the feature matrix.
//!
//! TF-IDF rows are overwhelmingly zero (a movie has a handful of cast
//! members out of thousands), so vectors store only their non-zero entries
//! as parallel, index-sorted arrays. Dot products are a merge over two
//! sorted lists: O(nnz) instead of O(dim).

use crate::numeric::NumericScaler;
use crate::schema::{CategoricalField, FeatureLayout};
use crate::vocabulary::Vocabulary;

/// One record's features: immutable once built.
///
/// Invariants: `indices` strictly increasing, every index `< dim`, no
/// stored zeros, `norm` is the L2 norm of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
    norm: f32,
}

impl FeatureVector {
    /// The all-zero vector
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
            norm: 0.0,
        }
    }

    /// Build from `(index, value)` pairs in any order.
    ///
    /// Repeated indices are summed and zeros dropped.
    ///
    /// Callers keep every index below `dim`; an index past it panics.
    pub(crate) fn from_sparse(dim: usize, mut entries: Vec<(u32, f32)>) -> Self {
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        let mut indices: Vec<u32> = Vec::with_capacity(entries.len());
        let mut values: Vec<f32> = Vec::with_capacity(entries.len());
        for (idx, value) in entries {
            assert!(
                (idx as usize) < dim,
                "feature index {idx} out of bounds for dimension {dim}"
            );
            match indices.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(idx);
                    values.push(value);
                }
            }
        }

        let (indices, values): (Vec<u32>, Vec<f32>) = indices
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v != 0.0)
            .unzip();
        let norm = l2_norm(&values);

        Self {
            dim,
            indices,
            values,
            norm,
        }
    }

    /// Build from a dense slice
    pub fn from_dense(values: &[f32]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(idx, v)| (idx as u32, *v))
            .collect();
        Self::from_sparse(values.len(), entries)
    }

    /// Scale to unit length. The zero vector stays zero.
    pub fn normalized(mut self) -> Self {
        if self.norm > 0.0 {
            let norm = self.norm;
            self.values.iter_mut().for_each(|v| *v /= norm);
            self.norm = l2_norm(&self.values);
        }
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.is_empty()
    }

    /// L2 norm, computed once at construction
    pub fn norm(&self) -> f32 {
        self.norm
    }

    /// Value at a dimension (0 for unstored entries)
    pub fn get(&self, dim: usize) -> f32 {
        match self.indices.binary_search(&(dim as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Non-zero entries as `(dimension, value)`, ascending by dimension
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(idx, v)| (*idx as usize, *v))
    }

    /// Dot product by merging the two sorted index lists.
    ///
    /// Accumulates in f64 and always in index order, so the result is the
    /// same on every run.
    pub fn dot(&self, other: &FeatureVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f64;

        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += f64::from(self.values[i]) * f64::from(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        sum as f32
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for (idx, v) in self.iter() {
            dense[idx] = v;
        }
        dense
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    values
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt() as f32
}

/// Feature vectors for a whole catalog, plus what was learned to build them.
///
/// Row `i` belongs to catalog record `i`. A matrix is only produced whole by
/// [`FeatureEncoder::encode`](crate::FeatureEncoder::encode); there is no API
/// to add, remove or edit rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<FeatureVector>,
    layout: FeatureLayout,
    vocabularies: [Vocabulary; CategoricalField::COUNT],
    scaler: NumericScaler,
}

impl FeatureMatrix {
    pub(crate) fn new(
        rows: Vec<FeatureVector>,
        layout: FeatureLayout,
        vocabularies: [Vocabulary; CategoricalField::COUNT],
        scaler: NumericScaler,
    ) -> Self {
        debug_assert!(rows.iter().all(|row| row.dim() == layout.dim()));
        Self {
            rows,
            layout,
            vocabularies,
            scaler,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dimensionality shared by every row
    pub fn dim(&self) -> usize {
        self.layout.dim()
    }

    pub fn row(&self, index: usize) -> Option<&FeatureVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureVector> {
        self.rows.iter()
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &Vocabulary {
        &self.vocabularies[field.position()]
    }

    pub fn scaler(&self) -> &NumericScaler {
        &self.scaler
    }
}
