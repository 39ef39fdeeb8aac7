//! The Catalog Store: an ordered, immutable collection of movie records.
//!
//! Record order matters. Index `i` here is row `i` of the feature matrix the
//! encoder builds, so a catalog is only ever constructed whole and never
//! edited afterwards.

use crate::error::Result;
use crate::parser;
use crate::types::{MovieRecord, RawMovie};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use tracing::{info, warn};

/// In-memory catalog for one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    /// Exact title -> index of its first occurrence
    title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from records, keeping their order.
    ///
    /// Titles are not required to be unique. The first record with a given
    /// title wins on lookup; later duplicates are logged.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut title_index = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            match title_index.entry(record.title.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(first) => {
                    warn!(
                        title = %record.title,
                        first = *first.get(),
                        duplicate = idx,
                        "Duplicate title; lookups resolve to the first occurrence"
                    );
                }
            }
        }

        Self {
            records,
            title_index,
        }
    }

    /// Build a catalog from raw ingestion tuples.
    pub fn from_raw(raw: Vec<RawMovie>) -> Self {
        let records: Vec<MovieRecord> = raw.into_par_iter().map(MovieRecord::from_raw).collect();
        Self::from_records(records)
    }

    /// Load a catalog file.
    ///
    /// `.json` files are read as a JSON array; anything else as `.dat`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let raw = if is_json {
            parser::parse_movies_json(path)?
        } else {
            parser::parse_movies_dat(path)?
        };

        let catalog = Self::from_raw(raw);
        info!(
            "Loaded {} movies ({} with release dates)",
            catalog.len(),
            catalog
                .records
                .iter()
                .filter(|r| r.release_date.is_some())
                .count()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by catalog index
    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.records.get(index)
    }

    /// All records, in catalog order
    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Resolve a title to its catalog index.
    ///
    /// Exact, case-sensitive match with no whitespace normalization.
    pub fn find_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Case-insensitive substring search over titles.
    ///
    /// Exact (case-insensitive) matches come first, then the rest in catalog
    /// order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(bool, usize)> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                let title = record.title.to_lowercase();
                if title == needle {
                    Some((false, idx))
                } else if title.contains(&needle) {
                    Some((true, idx))
                } else {
                    None
                }
            })
            .collect();

        // (is_partial, index): exact matches sort before partial ones
        matches.sort_unstable();
        matches.into_iter().map(|(_, idx)| idx).collect()
    }

    /// Number of distinct titles (duplicates counted once)
    pub fn distinct_titles(&self) -> usize {
        self.title_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            MovieRecord::new("The Matrix").with_genres("Action|Sci-Fi"),
            MovieRecord::new("The Matrix Reloaded").with_genres("Action|Sci-Fi"),
            MovieRecord::new("Heat").with_genres("Crime|Drama"),
            MovieRecord::new("The Matrix").with_genres("Documentary"),
        ])
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.get(0).is_none());
        assert!(catalog.find_title("Heat").is_none());
    }

    #[test]
    fn test_first_title_match_wins() {
        let catalog = sample_catalog();

        assert_eq!(catalog.find_title("The Matrix"), Some(0));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.distinct_titles(), 3);
    }

    #[test]
    fn test_find_title_is_exact() {
        let catalog = sample_catalog();

        assert_eq!(catalog.find_title("Heat"), Some(2));
        assert!(catalog.find_title("heat").is_none());
        assert!(catalog.find_title(" Heat").is_none());
    }

    #[test]
    fn test_search_orders_exact_matches_first() {
        let catalog = Catalog::from_records(vec![
            MovieRecord::new("Matrix Revisited"),
            MovieRecord::new("The Matrix"),
            MovieRecord::new("matrix"),
        ]);

        assert_eq!(catalog.search("MATRIX"), vec![2, 0, 1]);
        assert!(catalog.search("   ").is_empty());
        assert!(catalog.search("Heat").is_empty());
    }

    #[test]
    fn test_from_raw_keeps_order() {
        let raw = vec![
            RawMovie {
                title: "B".to_string(),
                ..RawMovie::default()
            },
            RawMovie {
                title: "A".to_string(),
                ..RawMovie::default()
            },
        ];
        let catalog = Catalog::from_raw(raw);

        assert_eq!(catalog.get(0).unwrap().title, "B");
        assert_eq!(catalog.get(1).unwrap().title, "A");
    }
}
