//! In-memory asset repository.
//!
//! Backs relaxed/offline deployments and tests. Shares predicate, sort,
//! and pagination logic with the Diesel repository through the query
//! engine, so both paginate identically.

use async_trait::async_trait;
use atelier_core::Asset;
use atelier_error::{AtelierResult, DatabaseError, DatabaseErrorKind};
use atelier_interface::{AssetRepository, OwnerDirectory};
use atelier_query::{AssetFilter, QueryPage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Asset repository held entirely in process memory.
#[derive(Default)]
pub struct MemoryAssetRepository {
    records: RwLock<HashMap<Uuid, Asset>>,
    owner_checks: Option<Arc<dyn OwnerDirectory>>,
}

impl MemoryAssetRepository {
    /// Repository without referential checks (relaxed mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that verifies `owner_id` on insert, mirroring the
    /// database foreign key so the writer's fallback path behaves the same
    /// against either backend.
    pub fn with_owner_checks(directory: Arc<dyn OwnerDirectory>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            owner_checks: Some(directory),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the repository is empty.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AssetRepository for MemoryAssetRepository {
    #[tracing::instrument(skip(self, asset), fields(id = %asset.id))]
    async fn insert(&self, asset: &Asset) -> AtelierResult<()> {
        if let Some(directory) = &self.owner_checks
            && !directory.exists(asset.owner_id).await?
        {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKeyViolation(
                "assets_owner_id_fkey".to_string(),
            ))
            .into());
        }

        let mut records = self.records.write().await;
        if records.contains_key(&asset.id) {
            return Err(DatabaseError::new(DatabaseErrorKind::Query(format!(
                "duplicate key: {}",
                asset.id
            )))
            .into());
        }
        records.insert(asset.id, asset.clone());
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AtelierResult<Option<Asset>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    #[tracing::instrument(skip(self, asset), fields(id = %asset.id))]
    async fn update(&self, asset: &Asset) -> AtelierResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(&asset.id) {
            return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
        }
        records.insert(asset.id, asset.clone());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AtelierResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn query(&self, client_id: Uuid, filter: &AssetFilter) -> AtelierResult<QueryPage> {
        let candidates: Vec<Asset> = self
            .records
            .read()
            .await
            .values()
            .filter(|asset| asset.client_id == client_id)
            .cloned()
            .collect();
        Ok(atelier_query::execute(candidates, filter))
    }
}
