//! A catalog and its feature matrix, published together.

use data_loader::Catalog;
use encoder::{EncodeError, FeatureEncoder, FeatureMatrix};
use std::time::Instant;
use tracing::info;

/// Immutable pairing of a catalog with the matrix encoded from it.
///
/// Built in one step and never mutated, so row `i` of the matrix always
/// describes record `i` of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    catalog: Catalog,
    matrix: FeatureMatrix,
}

impl CatalogSnapshot {
    /// Encode `catalog` and pair it with the result.
    pub fn build(catalog: Catalog, encoder: &FeatureEncoder) -> Result<Self, EncodeError> {
        let start = Instant::now();
        let matrix = encoder.encode(catalog.records())?;
        info!(
            "Built snapshot: {} movies, {} dimensions in {:.2?}",
            catalog.len(),
            matrix.dim(),
            start.elapsed()
        );
        Ok(Self { catalog, matrix })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;
    use encoder::EncoderConfig;

    #[test]
    fn test_rows_match_records() {
        let catalog = Catalog::from_records(vec![
            MovieRecord::new("A").with_genres("Drama"),
            MovieRecord::new("B").with_genres("Comedy"),
            MovieRecord::new("C"),
        ]);
        let snapshot = CatalogSnapshot::build(catalog, &FeatureEncoder::new(EncoderConfig::default())).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.matrix().len(), snapshot.catalog().len());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = CatalogSnapshot::build(Catalog::default(), &FeatureEncoder::default());
        assert_eq!(result.unwrap_err(), EncodeError::EmptyCatalog);
    }
}
