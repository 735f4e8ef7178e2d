//! TF-IDF text vectorization.
//!
//! Tokens are lowercase runs of alphanumeric characters (or `_`) at least two
//! characters long, minus a fixed stop-word list. The vocabulary is every token
//! seen while fitting, indexed in sorted order. Weights use smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, applied to raw counts, and each document vector
//! is L2-normalized.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ArtifactError;
use crate::sparse::SparseVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term → column index (sorted term order).
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column.
    idf: Vec<f64>,
    stop_words: Vec<String>,
}

impl TfidfVectorizer {
    /// Fit a vectorizer on a corpus of documents.
    ///
    /// An empty corpus (or one made entirely of stop words) yields an empty
    /// vocabulary; every transform then returns a zero-dimensional vector.
    pub fn fit<S: AsRef<str>>(documents: &[S], stop_words: &[&str]) -> Self {
        let stop_words: Vec<String> = stop_words.iter().map(|s| s.to_string()).collect();
        let n_docs = documents.len();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref(), &stop_words).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // BTreeMap iterates in sorted order, so enumeration gives sorted indices.
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(smoothed_idf(n_docs, df));
            vocabulary.insert(term, index);
        }

        debug!(documents = n_docs, vocabulary = vocabulary.len(), "fitted tf-idf vectorizer");
        Self {
            vocabulary,
            idf,
            stop_words,
        }
    }

    /// Vocabulary size, which is the dimension of every transformed vector.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = (&str, usize)> {
        self.vocabulary.iter().map(|(t, &i)| (t.as_str(), i))
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|i| self.idf[i])
    }

    /// Tokenize with this vectorizer's stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text, &self.stop_words)
    }

    /// Transform one document. Tokens outside the vocabulary are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        // BTreeMap keys are unique and ascending, and every index comes from
        // the vocabulary.
        let (indices, values): (Vec<usize>, Vec<f64>) = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .unzip();
        let mut vector = SparseVector::from_sorted(self.dim(), indices, values);
        vector.normalize();
        vector
    }

    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(ArtifactError::InvalidVectorizer(format!(
                "{} vocabulary terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        // Indices must be exactly 0..n in sorted term order.
        for (expected, (term, &index)) in self.vocabulary.iter().enumerate() {
            if index != expected {
                return Err(ArtifactError::InvalidVectorizer(format!(
                    "term {term:?} has index {index}, expected {expected}"
                )));
            }
        }
        if let Some(bad) = self.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ArtifactError::InvalidVectorizer(format!(
                "non-positive idf weight {bad}"
            )));
        }
        Ok(())
    }
}

fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// Lowercase, split on non-word characters, keep tokens of 2+ characters
/// that are not stop words.
pub fn tokenize(text: &str, stop_words: &[String]) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stop_words.iter().any(|s| s == t))
        .map(str::to_string)
        .collect()
}
