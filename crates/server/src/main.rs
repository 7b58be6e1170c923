//! HTTP server for the movie recommender.
//!
//! Loads the persisted artifacts once at startup and serves read-only
//! queries. With `--build-if-missing`, absent artifacts are rebuilt from
//! the TMDB CSV files first.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use data_loader::RawCatalog;
use pipeline::BuildPipeline;
use server::api::create_router;
use server::{FsArtifactStore, ServiceState, load_or_build};

#[derive(Parser)]
#[command(name = "movie-recs-server")]
#[command(about = "HTTP API for content-based movie recommendations", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "MOVIE_RECS_ADDR", default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    /// Directory holding the persisted artifacts
    #[arg(long, env = "MOVIE_RECS_ARTIFACT_DIR", default_value = "artifacts")]
    artifact_dir: PathBuf,

    /// Rebuild the artifacts from the raw data when they are missing
    #[arg(long)]
    build_if_missing: bool,

    /// Directory with tmdb_5000_movies.csv and tmdb_5000_credits.csv
    #[arg(long, env = "MOVIE_RECS_DATA_DIR", default_value = "data/tmdb")]
    data_dir: PathBuf,

    /// Keep only the N most popular movies when rebuilding
    #[arg(long, env = "MOVIE_RECS_CORPUS_LIMIT", default_value = "3000")]
    corpus_limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let store = FsArtifactStore::new(&args.artifact_dir);
    info!("Loading model artifacts from {}", args.artifact_dir.display());

    let state = if args.build_if_missing {
        let data_dir = args.data_dir.clone();
        let limit = args.corpus_limit;
        let built = tokio::task::spawn_blocking(move || {
            load_or_build(&BuildPipeline::new(), &store, || {
                Ok(RawCatalog::load_from_files(&data_dir)?
                    .truncate_by_popularity(Some(limit))
                    .into_records())
            })
        })
        .await
        .context("Build task panicked")?;
        match built {
            Ok(recommender) => ServiceState::Ready(Arc::new(recommender)),
            Err(e) => ServiceState::NotReady(format!("{:#}", e)),
        }
    } else {
        ServiceState::from_store(&store)
    };

    match &state {
        ServiceState::Ready(recommender) => {
            info!("Model ready: {} movies", recommender.catalog().len())
        }
        ServiceState::NotReady(reason) => {
            warn!("Serving without a model ({}); run `movie-recs build` first", reason)
        }
    }

    let app = create_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;
    info!("Listening on http://{}", args.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
