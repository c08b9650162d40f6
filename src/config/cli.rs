use crate::core::ArtifactStore;
use crate::utils::error::{Result, ScoringError};
use std::path::{Path, PathBuf};

/// Reads artifacts from the local filesystem. Relative paths resolve
/// against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Default for LocalArtifactStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArtifactStore for LocalArtifactStore {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tokio::fs::read(&full_path).await.map_err(|e| {
            ScoringError::artifact(full_path.display().to_string(), e.to_string())
        })
    }
}
