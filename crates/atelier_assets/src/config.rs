//! Pipeline configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Configuration for the ingestion and retrieval pipeline.
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct PipelineConfig {
    /// Upload size ceiling in bytes
    #[serde(default = "default_max_upload_bytes")]
    max_upload_bytes: u64,

    /// Relaxed mode: skip directory verification and permission checks,
    /// for local/offline operation
    #[serde(default)]
    relaxed: bool,
}

fn default_max_upload_bytes() -> u64 {
    200 * 1024 * 1024 // 200 MiB
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            relaxed: false,
        }
    }
}

impl PipelineConfig {
    /// Relaxed configuration for local/offline operation.
    pub fn relaxed_mode() -> Self {
        Self {
            relaxed: true,
            ..Self::default()
        }
    }
}
