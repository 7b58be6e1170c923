//! Error types for the server crate.
//!
//! "Not found" and "ambiguous" are kept apart from genuine failures:
//! ambiguity is a result shape (see [`crate::resolve::Resolution`]), not an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// `recommend` was called with a title that is not in the catalog
    #[error("Movie '{title}' not found in dataset")]
    TitleNotFound { title: String },

    /// Movies and similarity rows don't line up
    #[error("Catalog has {movies} movies but the similarity matrix has {rows} rows")]
    CatalogMisaligned { movies: usize, rows: usize },

    /// A persisted artifact is missing or can't be decoded
    #[error("Artifact '{name}' unavailable: {reason}")]
    ArtifactUnavailable { name: String, reason: String },

    /// An artifact couldn't be serialized
    #[error("Failed to encode artifact '{name}': {reason}")]
    ArtifactEncode { name: String, reason: String },

    /// Writing an artifact failed
    #[error("Failed to write artifact '{name}': {source}")]
    ArtifactWrite {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
