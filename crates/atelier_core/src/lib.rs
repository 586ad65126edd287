//! Domain model for the Atelier asset pipeline.
//!
//! The central entity is [`Asset`]: a managed media or document record with a
//! byte-store location, derived artifacts, and an open extension map for
//! technical metadata. [`Client`] and [`Owner`] are referenced, not owned,
//! lookup data.
//!
//! Typed fields replace the source system's string-keyed meta blob: tags,
//! categories, favourite flag, usage counter, dimensions, and duration are
//! struct fields; everything else lives in `Asset::metadata` under a
//! reserved-key filter.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod asset_type;
mod batch;
mod client;
mod telemetry;

pub use asset::{Asset, DerivativeStage, ProcessingWarning, RESERVED_METADATA_KEYS};
pub use asset_type::AssetType;
pub use batch::BatchReport;
pub use client::{Client, Identity, Owner, Role};
pub use telemetry::init_telemetry;
