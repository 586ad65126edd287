//! Byte store for Atelier asset originals and derivatives.
//!
//! This crate provides the raw byte seam of the pipeline: a [`ByteStore`]
//! trait with a filesystem implementation, plus the canonical path naming
//! convention ([`AssetPaths`]) the rest of the pipeline builds on.
//!
//! # Example
//!
//! ```no_run
//! use atelier_storage::{AssetPaths, ByteStore, FileSystemStore};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemStore::new("/var/atelier/media")?;
//! let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
//!
//! let original = paths.original("png");
//! store.write(&original, &[0x89, 0x50, 0x4E, 0x47]).await?;
//! let bytes = store.read(&original).await?;
//! assert_eq!(bytes.len(), 4);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod paths;
mod store;

pub use atelier_error::{StorageError, StorageErrorKind};
pub use filesystem::FileSystemStore;
pub use paths::{content_hash, AssetPaths};
pub use store::ByteStore;
