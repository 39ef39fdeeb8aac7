//! Parsers for catalog files.
//!
//! Two formats are supported:
//! - `.dat`: one movie per line, fields separated by "::"
//!   `title::genres::keywords::cast::companies::popularity::runtime::vote_count::vote_average::release_date`
//! - `.json`: an array of objects with the same field names
//!
//! Both produce [`RawMovie`] values; typing happens in
//! [`MovieRecord::from_raw`](crate::MovieRecord::from_raw).

use crate::error::{DataLoadError, Result};
use crate::types::RawMovie;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Number of "::"-separated fields on each `.dat` line
pub const DAT_FIELD_COUNT: usize = 10;

const FIELD_SEPARATOR: &str = "::";

/// Read a whole file as text.
///
/// Catalog dumps are not always clean UTF-8, so invalid bytes are replaced
/// rather than failing the load.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse a `.dat` catalog file.
///
/// Blank lines and lines starting with `#` are skipped. Lines are parsed in
/// parallel; the output keeps file order.
pub fn parse_movies_dat(path: &Path) -> Result<Vec<RawMovie>> {
    let content = read_text(path)?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_dat_str(&content, &file)
}

/// Parse `.dat` content that is already in memory.
pub fn parse_dat_str(content: &str, file: &str) -> Result<Vec<RawMovie>> {
    let lines: Vec<&str> = content.lines().collect();

    lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| parse_movie_line(line, file, idx + 1))
        .collect()
}

/// Parse a single `.dat` line.
fn parse_movie_line(line: &str, file: &str, line_no: usize) -> Result<RawMovie> {
    let parts: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR).collect();

    if parts.len() != DAT_FIELD_COUNT {
        return Err(DataLoadError::FieldCountMismatch {
            expected: DAT_FIELD_COUNT,
            found: parts.len(),
            line: line_no,
        });
    }

    let title = parts[0].trim();
    if title.is_empty() {
        return Err(DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing title".to_string(),
        });
    }

    Ok(RawMovie {
        title: title.to_string(),
        genres: parts[1].to_string(),
        keywords: parts[2].to_string(),
        cast: parts[3].to_string(),
        companies: parts[4].to_string(),
        popularity: parts[5].to_string(),
        runtime: parts[6].to_string(),
        vote_count: parts[7].to_string(),
        vote_average: parts[8].to_string(),
        release_date: parts[9].to_string(),
    })
}

/// Parse a JSON catalog file (an array of movie objects).
pub fn parse_movies_json(path: &Path) -> Result<Vec<RawMovie>> {
    let content = read_text(path)?;
    parse_json_str(&content)
}

/// Parse JSON content that is already in memory.
pub fn parse_json_str(content: &str) -> Result<Vec<RawMovie>> {
    let movies: Vec<RawMovie> = serde_json::from_str(content)?;
    Ok(movies)
}
