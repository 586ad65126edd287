//! Server configuration loading.

use atelier_assets::PipelineConfig;
use atelier_cache::AssetCacheConfig;
use atelier_error::ConfigError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_storage_root() -> String {
    "./media".to_string()
}

fn default_fallback_owner_id() -> Uuid {
    // Well-known id of the system fallback owner record.
    Uuid::from_u128(0x0000_0000_0000_4000_8000_00fa_11ba_c001)
}

/// Top-level server configuration.
///
/// Loaded from an optional `atelier.toml` plus `ATELIER_`-prefixed
/// environment overrides, after a best-effort `.env` load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Root directory of the filesystem byte store
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// PostgreSQL connection string; absent means the in-memory record
    /// store (relaxed/offline operation)
    #[serde(default)]
    pub database_url: Option<String>,

    /// Identity the server acts as when no external identity integration
    /// is wired in
    #[serde(default)]
    pub identity_user_id: Option<Uuid>,

    /// Id of the designated fallback owner record
    #[serde(default = "default_fallback_owner_id")]
    pub fallback_owner_id: Uuid,

    /// Pipeline limits and mode
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Read cache tuning
    #[serde(default)]
    pub cache: AssetCacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            storage_root: default_storage_root(),
            database_url: None,
            identity_user_id: None,
            fallback_owner_id: default_fallback_owner_id(),
            pipeline: PipelineConfig::default(),
            cache: AssetCacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load layered configuration: `atelier.toml` (optional), then
    /// `ATELIER_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("atelier").required(false))
            .add_source(
                config::Environment::with_prefix("ATELIER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_contained() {
        let config = ServerConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(*config.pipeline.max_upload_bytes(), 200 * 1024 * 1024);
    }

    #[test]
    fn deserializes_from_empty_input_with_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.storage_root, "./media");
        assert_eq!(config.fallback_owner_id, default_fallback_owner_id());
    }
}
