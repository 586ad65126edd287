//! Collaborator wiring from configuration.

use crate::config::ServerConfig;
use atelier_assets::AssetService;
use atelier_cache::AssetCache;
use atelier_core::Identity;
use atelier_database::{
    establish_pool, run_migrations, DatabaseAssetRepository, DatabaseClientDirectory,
    DatabaseOwnerDirectory, MemoryAssetRepository,
};
use atelier_error::AtelierResult;
use atelier_interface::{StaticClientDirectory, StaticIdentity, StaticOwnerDirectory};
use atelier_storage::FileSystemStore;
use std::sync::Arc;
use uuid::Uuid;

/// Build the asset service from configuration.
///
/// With a `database_url` the record store and directories are
/// Postgres-backed; without one the server runs against the in-memory
/// repository, which pairs naturally with relaxed mode for local/offline
/// operation.
pub fn build_service(config: &ServerConfig) -> AtelierResult<Arc<AssetService>> {
    let store = Arc::new(FileSystemStore::new(config.storage_root.clone())?);
    let cache = Arc::new(AssetCache::new(config.cache.clone()));

    let identity_user = config.identity_user_id.unwrap_or_else(Uuid::new_v4);
    let identity = Arc::new(StaticIdentity::new(Identity {
        user_id: identity_user,
        role: atelier_core::Role::Admin,
    }));

    let service = match &config.database_url {
        Some(database_url) => {
            let pool = establish_pool(database_url)?;
            run_migrations(&pool)?;
            tracing::info!("Record store: PostgreSQL");
            AssetService::new(
                Arc::new(DatabaseAssetRepository::new(pool.clone())),
                Arc::new(DatabaseClientDirectory::new(pool.clone())),
                Arc::new(DatabaseOwnerDirectory::new(pool, config.fallback_owner_id)),
                identity,
                store,
                cache,
                config.pipeline.clone(),
            )
        }
        None => {
            tracing::info!("Record store: in-memory");
            AssetService::new(
                Arc::new(MemoryAssetRepository::new()),
                Arc::new(StaticClientDirectory::new(Vec::new())),
                Arc::new(StaticOwnerDirectory::new(Vec::new(), config.fallback_owner_id)),
                identity,
                store,
                cache,
                config.pipeline.clone(),
            )
        }
    };

    Ok(Arc::new(service))
}
