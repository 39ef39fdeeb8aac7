//! Core domain types for the movie catalog.
//!
//! Two shapes of the same movie live here:
//! - [`RawMovie`]: every attribute as the loader found it (strings)
//! - [`MovieRecord`]: the typed, immutable record the rest of the system uses
//!
//! Categorical fields (genres, keywords, cast, companies) stay as raw
//! delimiter-separated strings. Splitting them is the encoder's job, because
//! the delimiter is a per-field encoding setting.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Date format used by catalog sources ("2009-12-10")
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Raw ingestion tuple
// =============================================================================

/// One movie exactly as supplied by a loader.
///
/// Every field defaults to an empty string, so sparse JSON objects load fine.
/// Numeric fields accept either JSON numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMovie {
    pub title: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub companies: String,
    #[serde(deserialize_with = "number_or_string")]
    pub popularity: String,
    #[serde(deserialize_with = "number_or_string")]
    pub runtime: String,
    #[serde(deserialize_with = "number_or_string")]
    pub vote_count: String,
    #[serde(deserialize_with = "number_or_string")]
    pub vote_average: String,
    pub release_date: String,
}

/// Accept `12.5`, `"12.5"` or `null` for a numeric column.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

// =============================================================================
// MovieRecord
// =============================================================================

/// A single catalog item.
///
/// Records are built once at load time and never mutated afterwards; the
/// `with_*` methods consume and return `Self`, so they are only usable while
/// the record is still being assembled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Delimiter-separated genres, e.g. "Action|Adventure|Sci-Fi"
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub companies: String,
    pub popularity: Option<f32>,
    /// Runtime in minutes
    pub runtime: Option<f32>,
    pub vote_count: Option<u32>,
    pub vote_average: Option<f32>,
    /// `None` when the source date was missing or unparseable
    pub release_date: Option<NaiveDate>,
}

impl MovieRecord {
    /// Create a record with only a title; every other field is empty.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = genres.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = cast.into();
        self
    }

    pub fn with_companies(mut self, companies: impl Into<String>) -> Self {
        self.companies = companies.into();
        self
    }

    pub fn with_popularity(mut self, popularity: f32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_runtime(mut self, runtime: f32) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Set both vote statistics at once
    pub fn with_votes(mut self, vote_count: u32, vote_average: f32) -> Self {
        self.vote_count = Some(vote_count);
        self.vote_average = Some(vote_average);
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Convert an ingestion tuple into a typed record.
    ///
    /// Never fails: a value that does not parse becomes `None` and is logged
    /// at `warn`, so one bad cell cannot drop the whole movie.
    pub fn from_raw(raw: RawMovie) -> Self {
        let title = raw.title.trim().to_string();

        let popularity = parse_number(&title, "popularity", &raw.popularity);
        let runtime = parse_number(&title, "runtime", &raw.runtime);
        let vote_count = parse_number(&title, "vote_count", &raw.vote_count);
        let vote_average = parse_number(&title, "vote_average", &raw.vote_average);
        let release_date = parse_release_date(&title, &raw.release_date);

        Self {
            title,
            genres: raw.genres,
            keywords: raw.keywords,
            cast: raw.cast,
            companies: raw.companies,
            popularity,
            runtime,
            vote_count,
            vote_average,
            release_date,
        }
    }

    /// Release year, if the release date is known
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}

/// Parse an optional numeric cell. Empty cells are silently `None`.
fn parse_number<T: std::str::FromStr>(title: &str, field: &str, value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(title, field, value, "Ignoring unparseable numeric value");
            None
        }
    }
}

/// Parse a release date in `YYYY-MM-DD` form.
///
/// Example: "2009-12-10" -> Some(2009-12-10)
///          "sometime in 2009" -> None (logged)
pub fn parse_release_date(title: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(title, value, error = %e, "Ignoring invalid release date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_avatar() -> RawMovie {
        RawMovie {
            title: " Avatar ".to_string(),
            genres: "Action|Adventure|Fantasy|Science Fiction".to_string(),
            keywords: "culture clash|future|space war".to_string(),
            cast: "Sam Worthington|Zoe Saldana".to_string(),
            companies: "Ingenious Film Partners|Lightstorm Entertainment".to_string(),
            popularity: "150.437577".to_string(),
            runtime: "162".to_string(),
            vote_count: "11800".to_string(),
            vote_average: "7.2".to_string(),
            release_date: "2009-12-10".to_string(),
        }
    }

    #[test]
    fn test_from_raw_parses_all_fields() {
        let record = MovieRecord::from_raw(raw_avatar());

        assert_eq!(record.title, "Avatar");
        assert_eq!(record.runtime, Some(162.0));
        assert_eq!(record.vote_count, Some(11800));
        assert_eq!(record.vote_average, Some(7.2));
        assert_eq!(record.release_date, NaiveDate::from_ymd_opt(2009, 12, 10));
        assert_eq!(record.release_year(), Some(2009));
        assert!(record.genres.contains("Science Fiction"));
    }

    #[test]
    fn test_invalid_values_degrade_to_none() {
        let mut raw = raw_avatar();
        raw.release_date = "2009-13-45".to_string();
        raw.runtime = "two hours".to_string();
        raw.vote_count = "-3".to_string();

        let record = MovieRecord::from_raw(raw);

        // The record survives; only the broken cells are dropped
        assert_eq!(record.title, "Avatar");
        assert_eq!(record.release_date, None);
        assert_eq!(record.runtime, None);
        assert_eq!(record.vote_count, None);
        assert_eq!(record.popularity, Some(150.437577));
    }

    #[test]
    fn test_empty_cells_are_none() {
        let record = MovieRecord::from_raw(RawMovie {
            title: "Untitled".to_string(),
            ..RawMovie::default()
        });

        assert_eq!(record.popularity, None);
        assert_eq!(record.release_date, None);
        assert!(record.genres.is_empty());
    }

    #[test]
    fn test_raw_movie_accepts_json_numbers() {
        let raw: RawMovie = serde_json::from_str(
            r#"{"title": "Heat", "runtime": 170, "vote_average": "7.7", "vote_count": null}"#,
        )
        .unwrap();

        assert_eq!(raw.runtime, "170");
        assert_eq!(raw.vote_average, "7.7");
        assert_eq!(raw.vote_count, "");
        assert_eq!(raw.genres, "");
    }

    #[test]
    fn test_builder() {
        let record = MovieRecord::new("Movie A")
            .with_genres("Action|Sci-Fi")
            .with_votes(10, 6.5);

        assert_eq!(record.title, "Movie A");
        assert_eq!(record.genres, "Action|Sci-Fi");
        assert_eq!(record.vote_count, Some(10));
        assert!(record.keywords.is_empty());
    }
}
