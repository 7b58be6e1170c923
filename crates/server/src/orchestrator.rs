//! # Build Orchestration
//!
//! Decides whether to rebuild the artifacts or load the persisted ones, and
//! wraps the result in a [`ServiceState`] for the serving layer:
//! 1. Artifacts present: load movies + similarity, validate alignment
//! 2. Artifacts absent: fetch raw records, run the pipeline, save, serve
//!
//! Artifacts count as present only when the build manifest is; a
//! present-but-corrupt artifact is an error, not a rebuild trigger.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use data_loader::RawMovieRecord;
use pipeline::{BuildArtifacts, BuildPipeline, ProcessedMovie, SimilarityMatrix};

use crate::catalog::CatalogIndex;
use crate::error::RecommendError;
use crate::persistence::{
    ArtifactManifest, ArtifactStore, MANIFEST_ARTIFACT, MOVIES_ARTIFACT, SIMILARITY_ARTIFACT,
    VECTORIZER_ARTIFACT, load_artifact, save_artifact,
};
use crate::recommender::Recommender;

/// What request handlers see: a ready recommender or the reason there isn't one
#[derive(Debug, Clone)]
pub enum ServiceState {
    Ready(Arc<Recommender>),
    NotReady(String),
}

impl ServiceState {
    /// Load persisted artifacts; failures become `NotReady`
    pub fn from_store(store: &dyn ArtifactStore) -> Self {
        match load_recommender(store) {
            Ok(recommender) => Self::Ready(Arc::new(recommender)),
            Err(e) => {
                error!("Recommender unavailable: {:#}", e);
                Self::NotReady(format!("{:#}", e))
            }
        }
    }

    pub fn recommender(&self) -> Option<&Arc<Recommender>> {
        match self {
            Self::Ready(recommender) => Some(recommender),
            Self::NotReady(_) => None,
        }
    }
}

/// Load the movies and similarity artifacts into a Recommender
pub fn load_recommender(store: &dyn ArtifactStore) -> Result<Recommender> {
    let start_time = Instant::now();
    let manifest: ArtifactManifest = load_artifact(store, MANIFEST_ARTIFACT)
        .context("No complete build found (manifest missing or unreadable)")?;
    let movies: Vec<ProcessedMovie> =
        load_artifact(store, MOVIES_ARTIFACT).context("Failed to load movies artifact")?;
    let similarity: SimilarityMatrix =
        load_artifact(store, SIMILARITY_ARTIFACT).context("Failed to load similarity artifact")?;
    if movies.len() != manifest.movies {
        return Err(RecommendError::ArtifactUnavailable {
            name: MOVIES_ARTIFACT.to_string(),
            reason: format!(
                "manifest expects {} movies, found {}",
                manifest.movies,
                movies.len()
            ),
        }
        .into());
    }
    let catalog = CatalogIndex::new(movies, similarity)?;

    info!(
        "Loaded catalog of {} movies in {:.2?}",
        catalog.len(),
        start_time.elapsed()
    );
    Ok(Recommender::new(catalog))
}

/// Run the pipeline on `records` and persist every artifact
pub fn build_and_save(
    pipeline: &BuildPipeline,
    records: &[RawMovieRecord],
    store: &dyn ArtifactStore,
) -> Result<Recommender> {
    let BuildArtifacts {
        movies,
        vector_space,
        similarity,
    } = pipeline.run(records).context("Model build failed")?;

    // Until the new manifest lands, the store reads as "no build"
    store.remove(MANIFEST_ARTIFACT)?;
    save_artifact(store, MOVIES_ARTIFACT, &movies)?;
    save_artifact(store, SIMILARITY_ARTIFACT, &similarity)?;
    save_artifact(store, VECTORIZER_ARTIFACT, &vector_space)?;
    let manifest = ArtifactManifest {
        movies: movies.len(),
        artifacts: [MOVIES_ARTIFACT, SIMILARITY_ARTIFACT, VECTORIZER_ARTIFACT]
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };
    save_artifact(store, MANIFEST_ARTIFACT, &manifest)?;
    info!("Saved movies, similarity and vectorizer artifacts");

    Ok(Recommender::new(CatalogIndex::new(movies, similarity)?))
}

/// Load cached artifacts, or build them from `source` when absent.
pub fn load_or_build<F>(
    pipeline: &BuildPipeline,
    store: &dyn ArtifactStore,
    source: F,
) -> Result<Recommender>
where
    F: FnOnce() -> Result<Vec<RawMovieRecord>>,
{
    if store.exists(MANIFEST_ARTIFACT) {
        info!("Found persisted artifacts, loading");
        return load_recommender(store);
    }

    warn!("Persisted artifacts missing, rebuilding");
    let records = source().context("Failed to load raw records")?;
    build_and_save(pipeline, &records, store)
}
