//! Batch build: raw records -> features -> vectors -> similarity.

use crate::features::{DEFAULT_CAST_LIMIT, FeatureBuilder, ProcessedMovie};
use crate::similarity::{SimilarityEngine, SimilarityMatrix};
use crate::vectorizer::{DEFAULT_MAX_FEATURES, TextVectorizer, VectorSpace};
use anyhow::{Result, ensure};
use data_loader::RawMovieRecord;
use std::time::Instant;
use tracing::info;

/// Everything the recommender needs, row-aligned
#[derive(Debug, Clone)]
pub struct BuildArtifacts {
    pub movies: Vec<ProcessedMovie>,
    pub vector_space: VectorSpace,
    pub similarity: SimilarityMatrix,
}

#[derive(Debug, Clone)]
pub struct BuildPipeline {
    features: FeatureBuilder,
    vectorizer: TextVectorizer,
    similarity: SimilarityEngine,
}

impl BuildPipeline {
    pub fn new() -> Self {
        Self {
            features: FeatureBuilder::new().with_cast_limit(DEFAULT_CAST_LIMIT),
            vectorizer: TextVectorizer::new().with_max_features(DEFAULT_MAX_FEATURES),
            similarity: SimilarityEngine::new(),
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.vectorizer = self.vectorizer.with_max_features(max_features);
        self
    }

    pub fn with_cast_limit(mut self, limit: usize) -> Self {
        self.features = self.features.with_cast_limit(limit);
        self
    }

    /// Run the three stages over `records`, in order.
    pub fn run(&self, records: &[RawMovieRecord]) -> Result<BuildArtifacts> {
        ensure!(!records.is_empty(), "Cannot build a catalog from zero movies");
        let start_time = Instant::now();

        let stage = Instant::now();
        let output = self.features.build_features(records);
        info!(
            "Built features for {} movies ({} malformed fields) in {:.2?}",
            output.movies.len(),
            output.malformed_fields,
            stage.elapsed()
        );

        let stage = Instant::now();
        let soups: Vec<&str> = output.movies.iter().map(|m| m.soup.as_str()).collect();
        let (vector_space, vectors) = self.vectorizer.fit_transform(&soups);
        info!(
            "Vectorized soups into {} terms in {:.2?}",
            vector_space.dimensions(),
            stage.elapsed()
        );

        let stage = Instant::now();
        let similarity = self.similarity.compute_similarity(&vectors);
        info!(
            "Computed {}x{} similarity matrix in {:.2?}",
            similarity.size(),
            similarity.size(),
            stage.elapsed()
        );

        info!("Build finished in {:.2?}", start_time.elapsed());
        Ok(BuildArtifacts {
            movies: output.movies,
            vector_space,
            similarity,
        })
    }
}

impl Default for BuildPipeline {
    fn default() -> Self {
        Self::new()
    }
}
