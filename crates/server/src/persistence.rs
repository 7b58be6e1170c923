//! Named artifact storage.
//!
//! An [`ArtifactStore`] holds opaque byte blobs by name. The typed helpers
//! encode with MessagePack, so a round trip keeps structure and row order.
//! Anything missing or undecodable comes back as `ArtifactUnavailable`.
//!
//! A build writes the manifest last and removes it first, so a store whose
//! manifest is present holds artifacts from one complete build.

use crate::error::{RecommendError, Result};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

pub const MOVIES_ARTIFACT: &str = "movies";
pub const SIMILARITY_ARTIFACT: &str = "similarity";
pub const VECTORIZER_ARTIFACT: &str = "vectorizer";
pub const MANIFEST_ARTIFACT: &str = "manifest";

/// Written after every other artifact of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    /// Row count shared by the movies and similarity artifacts
    pub movies: usize,
    pub artifacts: Vec<String>,
}

/// Blob storage keyed by artifact name
pub trait ArtifactStore: Send + Sync {
    fn save_bytes(&self, name: &str, bytes: &[u8]) -> Result<()>;

    fn load_bytes(&self, name: &str) -> Result<Vec<u8>>;

    fn exists(&self, name: &str) -> bool;

    /// Drop `name`; removing an absent artifact is not an error
    fn remove(&self, name: &str) -> Result<()>;
}

/// One `<name>.msgpack` file per artifact under a directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.msgpack"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let write_err = |source| RecommendError::ArtifactWrite {
            name: name.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let path = self.path(name);
        // Readers never see a half-written file
        let tmp = path.with_extension("msgpack.tmp");
        fs::write(&tmp, bytes).map_err(write_err)?;
        fs::rename(&tmp, &path).map_err(write_err)?;
        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn load_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path(name);
        fs::read(&path).map_err(|e| RecommendError::ArtifactUnavailable {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(RecommendError::ArtifactWrite {
                    name: name.to_string(),
                    source: e,
                })
            }
            _ => Ok(()),
        }
    }
}

/// In-process store, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save_bytes(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        blobs
            .get(name)
            .cloned()
            .ok_or_else(|| RecommendError::ArtifactUnavailable {
                name: name.to_string(),
                reason: "not stored".to_string(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        blobs.contains_key(name)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.remove(name);
        Ok(())
    }
}

/// Encode `value` and store it under `name`
pub fn save_artifact<T: Serialize>(store: &dyn ArtifactStore, name: &str, value: &T) -> Result<()> {
    let bytes = rmp_serde::to_vec(value).map_err(|e| RecommendError::ArtifactEncode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    store.save_bytes(name, &bytes)
}

/// Load and decode the artifact stored under `name`
pub fn load_artifact<T: DeserializeOwned>(store: &dyn ArtifactStore, name: &str) -> Result<T> {
    let bytes = store.load_bytes(name)?;
    rmp_serde::from_slice(&bytes).map_err(|e| RecommendError::ArtifactUnavailable {
        name: name.to_string(),
        reason: format!("decode failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::SimilarityMatrix;

    #[test]
    fn test_fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("artifacts"));
        let matrix = SimilarityMatrix::from_parts(2, vec![1.0, 0.25, 0.25, 1.0]).unwrap();

        assert!(!store.exists(SIMILARITY_ARTIFACT));
        save_artifact(&store, SIMILARITY_ARTIFACT, &matrix).unwrap();
        assert!(store.exists(SIMILARITY_ARTIFACT));

        let loaded: SimilarityMatrix = load_artifact(&store, SIMILARITY_ARTIFACT).unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_fs_save_replaces_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        save_artifact(&store, MOVIES_ARTIFACT, &vec!["old".to_string()]).unwrap();
        save_artifact(&store, MOVIES_ARTIFACT, &vec!["new".to_string()]).unwrap();

        let loaded: Vec<String> = load_artifact(&store, MOVIES_ARTIFACT).unwrap();
        assert_eq!(loaded, vec!["new"]);
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());
        store.save_bytes(MANIFEST_ARTIFACT, b"x").unwrap();

        store.remove(MANIFEST_ARTIFACT).unwrap();
        assert!(!store.exists(MANIFEST_ARTIFACT));
        // Already gone
        store.remove(MANIFEST_ARTIFACT).unwrap();
    }

    #[test]
    fn test_encode_failure_is_a_write_side_error() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cannot encode"))
            }
        }

        let store = MemoryArtifactStore::new();
        let err = save_artifact(&store, VECTORIZER_ARTIFACT, &Unencodable).unwrap_err();

        assert!(matches!(err, RecommendError::ArtifactEncode { ref name, .. } if name == "vectorizer"));
        assert!(!store.exists(VECTORIZER_ARTIFACT));
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let err = load_artifact::<SimilarityMatrix>(&store, MOVIES_ARTIFACT).unwrap_err();
        assert!(matches!(err, RecommendError::ArtifactUnavailable { ref name, .. } if name == "movies"));
    }

    #[test]
    fn test_corrupt_artifact() {
        let store = MemoryArtifactStore::new();
        store.save_bytes(SIMILARITY_ARTIFACT, b"\xc1garbage").unwrap();

        let err = load_artifact::<SimilarityMatrix>(&store, SIMILARITY_ARTIFACT).unwrap_err();
        assert!(matches!(err, RecommendError::ArtifactUnavailable { .. }));
    }

    #[test]
    fn test_bad_matrix_shape_is_rejected_on_load() {
        let store = MemoryArtifactStore::new();
        // (size, values) with 3 values for a 2x2 matrix
        let bytes = rmp_serde::to_vec(&(2usize, vec![1.0f32, 0.0, 1.0])).unwrap();
        store.save_bytes(SIMILARITY_ARTIFACT, &bytes).unwrap();

        assert!(load_artifact::<SimilarityMatrix>(&store, SIMILARITY_ARTIFACT).is_err());
    }
}
