//! Atelier - Creative Asset Pipeline
//!
//! Atelier is the asset ingestion, derivative-generation, and retrieval
//! pipeline of a creative-asset and campaign-production application. It
//! accepts uploaded files or URLs to externally generated media,
//! classifies them, produces thumbnails/previews/waveforms, extracts
//! technical metadata, persists records under referential constraints,
//! and serves them through a filtered, paginated, cached query interface.
//!
//! # Features
//!
//! - **Typed domain model**: `Asset` with first-class tags, categories,
//!   favourite flag, usage counter, dimensions, and duration; everything
//!   else in an open metadata map under a reserved-key filter
//! - **Failure-isolated derivatives**: thumbnail, preview/waveform, and
//!   metadata probe run concurrently; degradations become queryable
//!   `processing_warnings`, never failed ingestions
//! - **Single persistence writer**: one bounded referential-integrity
//!   fallback instead of cascading retries
//! - **Read-after-write consistency**: client-scoped cache invalidation
//!   completes before every mutation returns
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use atelier::{
//!     AssetCache, AssetService, FileSystemStore, PipelineConfig,
//!     StaticClientDirectory, StaticIdentity, StaticOwnerDirectory,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileSystemStore::new("./media")?);
//!     // wire repository, directories, identity, cache ...
//!     # Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL record store and directories

#![forbid(unsafe_code)]

pub use atelier_assets::{
    AssetService, AssetUpdate, BatchChanges, PersistenceWriter, PipelineConfig, RemoteFetchRequest,
    RemoteFetcher, UploadGate, UploadRequest,
};
pub use atelier_cache::{asset_key, client_list_prefix, list_key, AssetCache, AssetCacheConfig};
pub use atelier_core::{
    Asset, AssetType, BatchReport, Client, DerivativeStage, Identity, Owner, ProcessingWarning,
    Role,
};
#[cfg(feature = "database")]
pub use atelier_database::{
    DatabaseAssetRepository, DatabaseClientDirectory, DatabaseOwnerDirectory,
    MemoryAssetRepository,
};
pub use atelier_error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use atelier_interface::{
    AssetRepository, ClientDirectory, IdentityProvider, OwnerDirectory, StaticClientDirectory,
    StaticIdentity, StaticOwnerDirectory,
};
pub use atelier_media::{classify, DerivativeGenerator, DerivativeOutcome};
pub use atelier_query::{
    AssetFilter, AssetFilterBuilder, ClientRef, QueryPage, SortBy, SortDirection,
};
pub use atelier_storage::{content_hash, AssetPaths, ByteStore, FileSystemStore};
