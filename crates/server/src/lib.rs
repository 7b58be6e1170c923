//! Server crate for the movie recommender.
//!
//! Holds the online side of the system: the row-aligned catalog, the
//! recommender and its title resolution policy, artifact persistence,
//! build orchestration and the HTTP API.

pub mod error;
pub mod catalog;
pub mod recommender;
pub mod resolve;
pub mod persistence;
pub mod orchestrator;
pub mod api;

pub use catalog::CatalogIndex;
pub use error::{RecommendError, Result};
pub use orchestrator::{ServiceState, build_and_save, load_or_build, load_recommender};
pub use persistence::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use recommender::{DEFAULT_TOP_N, Recommender};
pub use resolve::{Resolution, SUGGESTION_LIMIT, resolve_title, suggestions};
