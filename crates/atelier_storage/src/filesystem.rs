//! Filesystem-based byte store implementation.

use crate::ByteStore;
use atelier_error::{AtelierResult, StorageError, StorageErrorKind};
use std::path::{Component, Path, PathBuf};

/// Filesystem storage backend.
///
/// Stores artifacts under a base directory using the pipeline's
/// store-relative paths:
///
/// ```text
/// /var/atelier/media/
/// └── {client_id}/
///     └── {asset_id}/
///         ├── original.png
///         ├── thumbnail.jpg
///         └── preview.jpg
/// ```
///
/// Writes go to a temp file first and are renamed into place for
/// atomicity; readers never observe a torn object.
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> AtelierResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem store");
        Ok(Self { base_path })
    }

    /// Resolve a store-relative path against the base directory.
    ///
    /// Rejects absolute paths and any `..` component so a crafted path can
    /// never escape the store root.
    fn resolve(&self, path: &str) -> AtelierResult<PathBuf> {
        if path.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(
                "empty path".to_string(),
            ))
            .into());
        }

        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::new(StorageErrorKind::InvalidPath(
                        path.to_string(),
                    ))
                    .into());
                }
            }
        }

        Ok(self.base_path.join(relative))
    }
}

#[async_trait::async_trait]
impl ByteStore for FileSystemStore {
    #[tracing::instrument(skip(self, data), fields(path = %path, size = data.len()))]
    async fn write(&self, path: &str, data: &[u8]) -> AtelierResult<()> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = target.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &target).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                target.display(),
                e
            )))
        })?;

        tracing::info!(path = %path, size = data.len(), "Stored object");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn read(&self, path: &str) -> AtelierResult<Vec<u8>> {
        let target = self.resolve(path)?;

        let data = tokio::fs::read(&target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    target.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(path = %path, size = data.len(), "Retrieved object");
        Ok(data)
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &str) -> AtelierResult<()> {
        let target = self.resolve(path)?;

        tokio::fs::remove_file(&target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    target.display(),
                    e
                )))
            }
        })?;

        tracing::info!(path = %path, "Deleted object");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %path))]
    async fn exists(&self, path: &str) -> AtelierResult<bool> {
        let target = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&target).await.unwrap_or(false))
    }
}
