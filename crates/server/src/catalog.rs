//! The frozen catalog: processed movies paired with their similarity rows.

use crate::error::{RecommendError, Result};
use pipeline::{ProcessedMovie, SimilarityMatrix};

/// Movies and similarity matrix, row-aligned.
///
/// Row `i` of the matrix belongs to `movies()[i]`. [`CatalogIndex::new`] is
/// the only way to build one, so the alignment always holds.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    movies: Vec<ProcessedMovie>,
    similarity: SimilarityMatrix,
}

impl CatalogIndex {
    pub fn new(movies: Vec<ProcessedMovie>, similarity: SimilarityMatrix) -> Result<Self> {
        if movies.len() != similarity.size() {
            return Err(RecommendError::CatalogMisaligned {
                movies: movies.len(),
                rows: similarity.size(),
            });
        }
        Ok(Self { movies, similarity })
    }

    pub fn movies(&self) -> &[ProcessedMovie] {
        &self.movies
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Row of the first movie titled exactly `title`
    pub fn position(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    pub fn title_at(&self, row: usize) -> Option<&str> {
        self.movies.get(row).map(|m| m.title.as_str())
    }
}
