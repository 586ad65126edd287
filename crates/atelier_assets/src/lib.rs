//! Ingestion, persistence, and retrieval service for Atelier assets.
//!
//! The pipeline in one place: [`UploadGate`] validates before any side
//! effect, [`atelier_media::DerivativeGenerator`] produces artifacts with
//! failure isolation, [`PersistenceWriter`] writes records under a single
//! bounded referential-integrity fallback, and [`AssetService`] ties the
//! read path (cache, query engine, slug resolution) and every mutation
//! together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gate;
mod patch;
mod remote;
mod service;
mod writer;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use gate::{UploadGate, UploadRequest, ValidatedUpload};
pub use patch::{AssetUpdate, BatchChanges};
pub use remote::{RemoteFetchRequest, RemoteFetcher};
pub use service::AssetService;
pub use writer::PersistenceWriter;
