//! Offline build pipeline for content-based movie similarity.
//!
//! This crate provides:
//! - FeatureBuilder: raw records to normalized token lists and a "soup"
//! - TextVectorizer: bag-of-words count vectors over a fitted vocabulary
//! - SimilarityEngine: dense pairwise cosine similarity
//! - BuildPipeline: the three stages chained together
//!
//! ## Architecture
//! The build runs once per corpus change:
//! 1. Structured-list columns are decoded (bad cells become empty lists)
//! 2. Soups are vectorized over the top-N most frequent terms
//! 3. The similarity matrix is computed, row-aligned with the movies
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::RawCatalog;
//! use pipeline::BuildPipeline;
//!
//! let catalog = RawCatalog::load_from_files(data_dir)?.truncate_by_popularity(Some(3000));
//! let artifacts = BuildPipeline::new().run(catalog.records())?;
//! println!("{} movies, {} terms", artifacts.movies.len(), artifacts.vector_space.dimensions());
//! ```

pub mod decode;
pub mod features;
pub mod stop_words;
pub mod vectorizer;
pub mod similarity;
pub mod build;

// Re-export main types
pub use build::{BuildArtifacts, BuildPipeline};
pub use decode::{decode_entries, parse_or_default};
pub use features::{DEFAULT_CAST_LIMIT, FeatureBuilder, FeatureOutput, ProcessedMovie};
pub use similarity::{SimilarityEngine, SimilarityMatrix};
pub use vectorizer::{DEFAULT_MAX_FEATURES, TextVectorizer, VectorMatrix, VectorSpace};
