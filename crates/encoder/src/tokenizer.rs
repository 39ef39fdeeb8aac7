//! Delimiter-based tokenization for categorical fields.

use crate::config::FieldConfig;
use crate::traits::{Tokenizer, Tokens};
use std::collections::HashSet;

/// Splits on a single delimiter character, trims every token and optionally
/// lowercases it. No stemming, no free-text word splitting: "Science Fiction"
/// stays one token.
#[derive(Debug, Clone)]
pub struct DelimitedTokenizer {
    delimiter: char,
    lowercase: bool,
    stop_words: HashSet<String>,
}

impl DelimitedTokenizer {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            lowercase: true,
            stop_words: HashSet::new(),
        }
    }

    /// Build from a field's configuration
    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.delimiter)
            .with_lowercase(config.lowercase)
            .with_stop_words(config.stop_words.iter().map(String::as_str))
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Exclude tokens from output. Stop words go through the same
    /// normalization as tokens, so "Stan Lee" also matches "stan lee".
    pub fn with_stop_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        let normalized: Vec<String> = words.into_iter().map(|w| self.normalize(w)).collect();
        self.stop_words.extend(normalized.into_iter().filter(|w| !w.is_empty()));
        self
    }

    fn normalize(&self, token: &str) -> String {
        let token = token.trim();
        if self.lowercase {
            token.to_lowercase()
        } else {
            token.to_string()
        }
    }
}

impl Tokenizer for DelimitedTokenizer {
    fn name(&self) -> &str {
        "DelimitedTokenizer"
    }

    fn tokenize(&self, raw: &str) -> Tokens {
        let mut tokens = Tokens::default();
        if raw.trim().is_empty() {
            return tokens;
        }

        for segment in raw.split(self.delimiter) {
            let token = self.normalize(segment);
            if token.is_empty() {
                tokens.empty_segments += 1;
            } else if !self.stop_words.contains(&token) {
                tokens.terms.push(token);
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trim_lowercase() {
        let tokenizer = DelimitedTokenizer::new('|');
        let tokens = tokenizer.tokenize(" Action | Science Fiction|Adventure ");

        assert_eq!(tokens.terms, vec!["action", "science fiction", "adventure"]);
        assert_eq!(tokens.empty_segments, 0);
    }

    #[test]
    fn test_case_preserved_when_disabled() {
        let tokenizer = DelimitedTokenizer::new(',').with_lowercase(false);
        let tokens = tokenizer.tokenize("Tom Hanks,Meg Ryan");

        assert_eq!(tokens.terms, vec!["Tom Hanks", "Meg Ryan"]);
    }

    #[test]
    fn test_empty_field_is_not_malformed() {
        let tokenizer = DelimitedTokenizer::new('|');

        assert_eq!(tokenizer.tokenize(""), Tokens::default());
        assert_eq!(tokenizer.tokenize("   "), Tokens::default());
    }

    #[test]
    fn test_empty_segments_are_counted() {
        let tokenizer = DelimitedTokenizer::new('|');
        let tokens = tokenizer.tokenize("Action||Drama|");

        assert_eq!(tokens.terms, vec!["action", "drama"]);
        assert_eq!(tokens.empty_segments, 2);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let tokenizer = DelimitedTokenizer::new('|');
        let tokens = tokenizer.tokenize("spy|Spy|gadgets");

        assert_eq!(tokens.terms, vec!["spy", "spy", "gadgets"]);
    }

    #[test]
    fn test_stop_words() {
        let config = FieldConfig {
            stop_words: vec!["Stan Lee".to_string(), " ".to_string()],
            ..FieldConfig::default()
        };
        let tokenizer = DelimitedTokenizer::from_config(&config);
        let tokens = tokenizer.tokenize("Robert Downey Jr.|stan lee|Gwyneth Paltrow");

        assert_eq!(tokens.terms, vec!["robert downey jr.", "gwyneth paltrow"]);
        assert_eq!(tokens.empty_segments, 0);
    }
}
