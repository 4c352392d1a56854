//! Local filesystem storage implementation.
//!
//! Keeps the latest batch in a single JSON file and replaces it with a
//! write-to-temp-then-rename, so a crash mid-write leaves the previous
//! batch intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{NotificationRow, StorageConfig};
use crate::storage::{BatchStore, StoredBatch};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    file_name: String,
}

impl LocalStorage {
    /// Default document name inside the root directory.
    pub const DEFAULT_FILE: &'static str = "latest.json";

    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_file(root_dir, Self::DEFAULT_FILE)
    }

    /// Create a LocalStorage using a custom document name.
    pub fn with_file(root_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::with_file(&config.dir, &config.file_name)
    }

    /// Full path of the batch document.
    pub fn batch_path(&self) -> PathBuf {
        self.path(&self.file_name)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the full stored document, including its timestamp.
    pub async fn load_batch(&self) -> Result<Option<StoredBatch>> {
        self.read_json(&self.file_name).await
    }
}

#[async_trait]
impl BatchStore for LocalStorage {
    async fn get_all(&self) -> Result<Vec<NotificationRow>> {
        match self.load_batch().await? {
            Some(batch) => Ok(batch.rows),
            None => {
                log::debug!("No batch stored at {}", self.batch_path().display());
                Ok(Vec::new())
            }
        }
    }

    async fn replace_all(&self, rows: &[NotificationRow]) -> Result<()> {
        let batch = StoredBatch::new(rows.to_vec());
        self.write_json(&self.file_name, &batch).await?;

        if rows.is_empty() {
            log::warn!("Stored batch cleared");
        } else {
            log::info!(
                "Stored {} latest notifications in {}",
                batch.count,
                self.batch_path().display()
            );
        }
        Ok(())
    }
}
