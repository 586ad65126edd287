//! Byte store trait definition.

use atelier_error::AtelierResult;

/// Trait for pluggable byte storage backends.
///
/// Implementations move raw bytes at store-relative, slash-separated paths;
/// path naming belongs to the pipeline (see [`crate::AssetPaths`]), and all
/// business logic stays above this seam.
#[async_trait::async_trait]
pub trait ByteStore: Send + Sync {
    /// Write bytes at a path, replacing any existing object.
    async fn write(&self, path: &str, data: &[u8]) -> AtelierResult<()>;

    /// Read the bytes at a path.
    async fn read(&self, path: &str) -> AtelierResult<Vec<u8>>;

    /// Delete the object at a path.
    ///
    /// Deleting a missing object is an error; best-effort cleanup callers
    /// log and continue.
    async fn delete(&self, path: &str) -> AtelierResult<()>;

    /// Whether an object exists at a path.
    async fn exists(&self, path: &str) -> AtelierResult<bool>;
}
