//! # Data Loader Crate
//!
//! This crate holds the movie catalog and the loaders that fill it.
//!
//! ## Main Components
//!
//! - **types**: `MovieRecord` (typed, immutable) and `RawMovie` (ingestion tuple)
//! - **parser**: parse `.dat` and `.json` catalog files into `RawMovie`s
//! - **catalog**: the ordered Catalog Store with exact title lookup
//! - **error**: error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/movies.dat"))?;
//! let idx = catalog.find_title("Avatar").unwrap();
//! println!("{} is movie #{}", catalog.get(idx).unwrap().title, idx);
//! ```

pub mod catalog;
pub mod error;
pub mod parser;
pub mod types;

pub use catalog::Catalog;
pub use error::{DataLoadError, Result};
pub use types::{MovieRecord, RawMovie};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_dat_content() {
        let content = "\
Avatar::Action|Adventure::space::Sam Worthington::Lightstorm::150.4::162::11800::7.2::2009-12-10
Titanic::Drama|Romance::ship::Kate Winslet::Paramount::100.0::194::7562::7.5::not a date
";
        let raw = parser::parse_dat_str(content, "movies.dat").unwrap();
        let catalog = Catalog::from_raw(raw);

        assert_eq!(catalog.len(), 2);

        let titanic = catalog.get(catalog.find_title("Titanic").unwrap()).unwrap();
        assert_eq!(titanic.runtime, Some(194.0));
        // A broken date does not drop the movie
        assert!(titanic.release_date.is_none());
    }
}
