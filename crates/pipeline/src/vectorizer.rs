//! Bag-of-words vectorization of the movie soups.
//!
//! ## Tokens
//! The soup is lower-cased and split into maximal runs of alphanumeric or
//! `_` characters; runs shorter than two characters and English stop-words
//! are dropped.
//!
//! ## Vocabulary
//! Terms are ranked by total count over the corpus (ties alphabetical) and
//! the top `max_features` are kept. Columns are then laid out alphabetically.

use crate::stop_words::is_stop_word;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Default vocabulary size cap
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Split text into vocabulary candidates
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// A fitted vocabulary: term -> column.
///
/// The map is ordered, so iterating it yields terms in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorSpace {
    terms: BTreeMap<String, usize>,
}

impl VectorSpace {
    /// Number of columns
    pub fn dimensions(&self) -> usize {
        self.terms.len()
    }

    /// Terms in column order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.terms.get(term).copied()
    }

    /// Count vector of `text` in this space; unknown terms are ignored
    pub fn transform(&self, text: &str) -> Vec<u32> {
        let mut counts = vec![0; self.dimensions()];
        for token in tokenize(text) {
            if let Some(col) = self.column(&token) {
                counts[col] += 1;
            }
        }
        counts
    }
}

/// Dense per-movie term counts, row-major.
///
/// Row `i` belongs to the i-th soup passed to the vectorizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatrix {
    rows: usize,
    cols: usize,
    counts: Vec<u32>,
}

impl VectorMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[u32] {
        &self.counts[i * self.cols..(i + 1) * self.cols]
    }
}

/// Fits a vocabulary and counts terms, in one pass over the corpus.
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    max_features: usize,
}

impl TextVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }

    /// Configure the vocabulary size cap (default: 5000)
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Fit the vocabulary on `soups` and return it with their count matrix
    pub fn fit_transform<S: AsRef<str>>(&self, soups: &[S]) -> (VectorSpace, VectorMatrix) {
        let tokenized: Vec<Vec<String>> = soups.iter().map(|s| tokenize(s.as_ref())).collect();

        let mut frequencies: HashMap<&str, u64> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *frequencies.entry(token.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&str, u64)> = frequencies.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut selected: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        selected.sort_unstable();
        let terms: BTreeMap<String, usize> = selected
            .into_iter()
            .enumerate()
            .map(|(col, term)| (term.to_string(), col))
            .collect();
        let space = VectorSpace { terms };

        let cols = space.dimensions();
        let mut counts = vec![0u32; tokenized.len() * cols];
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                if let Some(col) = space.column(token) {
                    counts[row * cols + col] += 1;
                }
            }
        }

        debug!(
            "Vectorized {} documents over {} terms",
            tokenized.len(),
            cols
        );

        let matrix = VectorMatrix {
            rows: tokenized.len(),
            cols,
            counts,
        };
        (space, matrix)
    }
}

impl Default for TextVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("SamuelL.Jackson the ScienceFiction a x_y"),
            vec!["samuell", "jackson", "sciencefiction", "x_y"]
        );
    }

    #[test]
    fn test_fit_transform_counts() {
        let soups = ["spy spy action", "action drama", ""];
        let (space, matrix) = TextVectorizer::new().fit_transform(&soups);

        let vocab: Vec<_> = space.vocabulary().collect();
        assert_eq!(vocab, vec!["action", "drama", "spy"]);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.row(0), &[1, 0, 2]);
        assert_eq!(matrix.row(1), &[1, 1, 0]);
        assert_eq!(matrix.row(2), &[0, 0, 0]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let soups = ["alpha beta beta gamma", "beta gamma", "delta"];
        let (space, matrix) = TextVectorizer::new()
            .with_max_features(2)
            .fit_transform(&soups);

        // beta: 3, gamma: 2, alpha and delta: 1
        let vocab: Vec<_> = space.vocabulary().collect();
        assert_eq!(vocab, vec!["beta", "gamma"]);
        assert_eq!(matrix.row(2), &[0, 0]);
    }

    #[test]
    fn test_frequency_ties_are_alphabetical() {
        let soups = ["zulu yankee xray"];
        let (space, _) = TextVectorizer::new()
            .with_max_features(2)
            .fit_transform(&soups);

        let vocab: Vec<_> = space.vocabulary().collect();
        assert_eq!(vocab, vec!["xray", "yankee"]);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let (space, _) = TextVectorizer::new().fit_transform(&["action drama"]);
        assert_eq!(space.transform("Action action western"), vec![2, 0]);
    }
}
