//! Per-field vocabulary with smoothed inverse document frequency.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Smoothed IDF: `ln((1 + n) / (1 + df)) + 1`.
///
/// Finite for `df = 0` and never below 1, even for a token present in every
/// document.
pub fn smoothed_idf(documents: usize, doc_freq: usize) -> f32 {
    let ratio = (1 + documents) as f64 / (1 + doc_freq) as f64;
    (ratio.ln() + 1.0) as f32
}

/// The distinct tokens of one categorical field across the whole catalog.
///
/// Term indices follow lexicographic token order, so two fits over the same
/// corpus agree regardless of record traversal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, u32>,
    doc_freq: Vec<u32>,
    idf: Vec<f32>,
    documents: usize,
}

impl Vocabulary {
    /// Learn a vocabulary from tokenized documents (one slice per record).
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut doc_freq: BTreeMap<&'a str, u32> = BTreeMap::new();
        let mut n_documents = 0;

        for tokens in documents {
            n_documents += 1;
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        let mut vocab = Self {
            documents: n_documents,
            ..Self::default()
        };
        for (position, (term, df)) in doc_freq.into_iter().enumerate() {
            vocab.index.insert(term.to_string(), position as u32);
            vocab.terms.push(term.to_string());
            vocab.doc_freq.push(df);
            vocab.idf.push(smoothed_idf(n_documents, df as usize));
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of documents the vocabulary was fitted on
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// All terms in index order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn doc_freq(&self, index: usize) -> Option<u32> {
        self.doc_freq.get(index).copied()
    }

    pub fn idf(&self, index: usize) -> Option<f32> {
        self.idf.get(index).copied()
    }
}
