//! On-disk index lifecycle: one JSON document per sanitized repo id.
//!
//! `save`, `exists`, `load` and `delete` are independent, idempotent
//! operations. Saving goes through a temp file and rename so a crashed
//! write never leaves a half-built index claiming success.

use crate::error::{Result, VectorStoreError};
use crate::types::EmbeddingIndex;
use std::path::{Path, PathBuf};

pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the index document for a repo id.
    #[must_use]
    pub fn path_for(&self, repo_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_repo_id(repo_id)))
    }

    pub async fn save(&self, index: &EmbeddingIndex) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(&index.repo_id);
        let data = serde_json::to_string(index)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;

        log::info!(
            "saved index '{}' ({} vectors) to {}",
            index.repo_id,
            index.embeddings.len(),
            path.display()
        );
        Ok(())
    }

    pub async fn exists(&self, repo_id: &str) -> bool {
        tokio::fs::try_exists(self.path_for(repo_id))
            .await
            .unwrap_or(false)
    }

    /// Load a stored index. A missing file is [`VectorStoreError::NotFound`];
    /// an unparsable one is [`VectorStoreError::CorruptIndex`].
    pub async fn load(&self, repo_id: &str) -> Result<EmbeddingIndex> {
        let path = self.path_for(repo_id);
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(VectorStoreError::NotFound(repo_id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&data)
            .map_err(|err| VectorStoreError::CorruptIndex(repo_id.to_string(), err.to_string()))
    }

    /// Delete a stored index. Deleting one that does not exist succeeds.
    pub async fn delete(&self, repo_id: &str) -> Result<()> {
        let path = self.path_for(repo_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::info!("deleted index '{repo_id}'");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Repo ids come from the outside world; everything that is not
/// `[A-Za-z0-9._-]` becomes `_` before touching the file system.
#[must_use]
pub fn sanitize_repo_id(repo_id: &str) -> String {
    repo_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
