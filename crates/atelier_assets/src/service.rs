//! The consolidated asset service.
//!
//! Single implementation of the ingestion and retrieval pipeline: upload
//! gate, derivative generation, persistence writer, cached query path, and
//! every mutation. Mutations of one asset id serialize through a per-id
//! lock, and cache invalidation completes before any mutating call
//! returns.

use crate::config::PipelineConfig;
use crate::gate::{UploadGate, UploadRequest};
use crate::patch::{normalize_labels, AssetUpdate, BatchChanges};
use crate::remote::{RemoteFetcher, RemoteFetchRequest};
use crate::writer::PersistenceWriter;
use atelier_cache::{asset_key, client_list_prefix, list_key, AssetCache};
use atelier_core::{Asset, BatchReport, Identity};
use atelier_error::{
    AtelierResult, CacheError, NotFoundError, NotFoundErrorKind, PermissionError,
};
use atelier_interface::{AssetRepository, ClientDirectory, IdentityProvider, OwnerDirectory};
use atelier_media::DerivativeGenerator;
use atelier_query::{AssetFilter, ClientRef, QueryPage};
use atelier_storage::{content_hash, AssetPaths, ByteStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

/// Asset ingestion, mutation, and retrieval, behind one service.
pub struct AssetService {
    repository: Arc<dyn AssetRepository>,
    identity: Arc<dyn IdentityProvider>,
    clients: Arc<dyn ClientDirectory>,
    store: Arc<dyn ByteStore>,
    cache: Arc<AssetCache>,
    gate: UploadGate,
    fetcher: RemoteFetcher,
    generator: DerivativeGenerator,
    writer: PersistenceWriter,
    relaxed: bool,
    write_locks: StdMutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl AssetService {
    /// Wire the service over its collaborators.
    pub fn new(
        repository: Arc<dyn AssetRepository>,
        clients: Arc<dyn ClientDirectory>,
        owners: Arc<dyn OwnerDirectory>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn ByteStore>,
        cache: Arc<AssetCache>,
        config: PipelineConfig,
    ) -> Self {
        let relaxed = *config.relaxed();
        let gate = UploadGate::new(clients.clone(), config.clone());
        let fetcher = RemoteFetcher::new(*config.max_upload_bytes());
        let writer = PersistenceWriter::new(
            repository.clone(),
            clients.clone(),
            owners,
            store.clone(),
            relaxed,
        );
        Self {
            repository,
            identity,
            clients,
            store,
            cache,
            gate,
            fetcher,
            generator: DerivativeGenerator::new(),
            writer,
            relaxed,
            write_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Ingest an uploaded file.
    ///
    /// Validation runs before any side effect; derivative sub-tasks run
    /// concurrently and settle before the record is written; a failed
    /// write cleans up every byte already placed.
    #[tracing::instrument(skip(self, request), fields(filename = %request.original_filename))]
    pub async fn ingest(&self, request: UploadRequest) -> AtelierResult<Asset> {
        let identity = self.identity.current().await?;
        let validated = self.gate.validate(request).await?;

        let asset_id = Uuid::new_v4();
        let paths = AssetPaths::new(validated.client_id, asset_id);
        let original = paths.original(&validated.extension);

        self.store.write(&original, &validated.bytes).await?;

        let outcome = self
            .generator
            .generate(
                validated.asset_type,
                &validated.bytes,
                &validated.extension,
                &paths,
                self.store.as_ref(),
            )
            .await;

        let mut asset = Asset::new(
            validated.name,
            validated.asset_type,
            original,
            identity.user_id,
            validated.client_id,
        );
        // Record id matches the storage prefix the artifacts live under.
        asset.id = asset_id;
        asset.description = validated.description;
        asset.tags = validated.tags;
        asset.categories = validated.categories;
        asset.size_bytes = Some(validated.bytes.len() as i64);
        let digest = content_hash(&validated.bytes);
        outcome.apply_to(&mut asset);
        asset.metadata.insert("contentHash".to_string(), digest);

        self.writer.persist_new(&mut asset).await?;
        self.invalidate(asset.id, asset.client_id);

        tracing::info!(
            id = %asset.id,
            client_id = %asset.client_id,
            asset_type = %asset.asset_type,
            warnings = asset.processing_warnings.len(),
            "Ingested asset"
        );
        Ok(asset)
    }

    /// Ingest externally generated media by URL.
    pub async fn ingest_remote(&self, request: RemoteFetchRequest) -> AtelierResult<Asset> {
        let upload = self.fetcher.fetch(request).await?;
        self.ingest(upload).await
    }

    /// Fetch one asset, through the cache.
    pub async fn get(&self, id: Uuid, client_id: Uuid) -> AtelierResult<Asset> {
        let key = asset_key(id, client_id);
        if let Some(value) = self.cache.get(&key)
            && let Ok(asset) = serde_json::from_value::<Asset>(value)
        {
            return Ok(asset);
        }

        let asset = self
            .repository
            .fetch(id)
            .await?
            .filter(|asset| asset.client_id == client_id)
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Asset(id.to_string())))?;

        let value = serde_json::to_value(&asset).map_err(|e| CacheError::new(e.to_string()))?;
        self.cache.insert(&key, value, None);
        Ok(asset)
    }

    /// Evaluate a filtered, paginated query, through the cache.
    ///
    /// An unresolvable client slug yields an empty page, not an error.
    #[tracing::instrument(skip(self, filter))]
    pub async fn query(&self, client: ClientRef, filter: AssetFilter) -> AtelierResult<QueryPage> {
        let client_id = match client {
            ClientRef::Id(id) => Some(id),
            ClientRef::Slug(slug) => self.clients.resolve_slug(&slug).await?,
        };
        let Some(client_id) = client_id else {
            return Ok(QueryPage::empty(filter.limit, filter.offset));
        };

        let key = list_key(client_id, &filter.signature());
        if let Some(value) = self.cache.get(&key)
            && let Ok(page) = serde_json::from_value::<QueryPage>(value)
        {
            return Ok(page);
        }

        let page = self.repository.query(client_id, &filter).await?;
        let value = serde_json::to_value(&page).map_err(|e| CacheError::new(e.to_string()))?;
        self.cache.insert(&key, value, None);
        Ok(page)
    }

    /// Update descriptive fields.
    pub async fn update(&self, id: Uuid, patch: AssetUpdate) -> AtelierResult<Asset> {
        self.mutate(id, |asset| {
            if let Some(name) = &patch.name
                && !name.trim().is_empty()
            {
                asset.name = name.trim().to_string();
            }
            if let Some(description) = &patch.description {
                asset.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
            }
            if let Some(tags) = &patch.tags {
                asset.tags = normalize_labels(tags);
            }
            if let Some(categories) = &patch.categories {
                asset.categories = normalize_labels(categories);
            }
        })
        .await
    }

    /// Set or flip the favourite flag; omitting the value flips the
    /// current state. Idempotent for explicit values.
    pub async fn toggle_favourite(&self, id: Uuid, desired: Option<bool>) -> AtelierResult<Asset> {
        self.mutate(id, |asset| {
            asset.is_favourite = desired.unwrap_or(!asset.is_favourite);
        })
        .await
    }

    /// Increment the monotonic usage counter.
    pub async fn increment_usage(&self, id: Uuid) -> AtelierResult<Asset> {
        self.mutate(id, |asset| {
            asset.usage_count += 1;
        })
        .await
    }

    /// Delete an asset and schedule byte-store cleanup of its artifacts.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AtelierResult<()> {
        let identity = self.identity.current().await?;
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let asset = self.load(id).await?;
        self.authorize(&identity, &asset)?;

        if !self.repository.delete(id).await? {
            return Err(NotFoundError::new(NotFoundErrorKind::Asset(id.to_string())).into());
        }
        self.writer.cleanup_artifacts(&asset).await;
        self.invalidate(id, asset.client_id);
        self.write_locks
            .lock()
            .expect("write lock map poisoned")
            .remove(&id);

        tracing::info!(id = %id, client_id = %asset.client_id, "Deleted asset");
        Ok(())
    }

    /// Apply set-level tag/category changes to many assets, reporting
    /// per-item outcomes instead of failing atomically.
    pub async fn batch_update(&self, ids: &[Uuid], changes: &BatchChanges) -> BatchReport {
        let outcomes = futures::future::join_all(ids.iter().map(|&id| async move {
            let result = self
                .mutate(id, |asset| {
                    for tag in normalize_labels(&changes.add_tags) {
                        asset.tags.insert(tag);
                    }
                    for tag in normalize_labels(&changes.remove_tags) {
                        asset.tags.remove(&tag);
                    }
                    for category in normalize_labels(&changes.add_categories) {
                        asset.categories.insert(category);
                    }
                    for category in normalize_labels(&changes.remove_categories) {
                        asset.categories.remove(&category);
                    }
                })
                .await;
            (id, result)
        }))
        .await;

        let mut report = BatchReport::default();
        for (id, result) in outcomes {
            match result {
                Ok(_) => report.record_ok(),
                Err(error) => report.record_err(id, error.to_string()),
            }
        }
        report
    }

    /// Delete many assets, reporting per-item outcomes.
    pub async fn batch_delete(&self, ids: &[Uuid]) -> BatchReport {
        let outcomes = futures::future::join_all(
            ids.iter()
                .map(|&id| async move { (id, self.delete(id).await) }),
        )
        .await;

        let mut report = BatchReport::default();
        for (id, result) in outcomes {
            match result {
                Ok(()) => report.record_ok(),
                Err(error) => report.record_err(id, error.to_string()),
            }
        }
        report
    }

    /// Read raw bytes from the store (media serving path).
    pub async fn read_bytes(&self, path: &str) -> AtelierResult<Vec<u8>> {
        self.store.read(path).await
    }

    async fn mutate<F>(&self, id: Uuid, mutator: F) -> AtelierResult<Asset>
    where
        F: FnOnce(&mut Asset),
    {
        let identity = self.identity.current().await?;
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut asset = self.load(id).await?;
        self.authorize(&identity, &asset)?;

        mutator(&mut asset);
        asset.touch();
        self.repository.update(&asset).await?;
        self.invalidate(asset.id, asset.client_id);
        Ok(asset)
    }

    async fn load(&self, id: Uuid) -> AtelierResult<Asset> {
        self.repository
            .fetch(id)
            .await?
            .ok_or_else(|| NotFoundError::new(NotFoundErrorKind::Asset(id.to_string())).into())
    }

    fn authorize(&self, identity: &Identity, asset: &Asset) -> AtelierResult<()> {
        if self.relaxed || identity.may_mutate(asset.owner_id) {
            return Ok(());
        }
        Err(PermissionError::new(format!(
            "user {} is not the owner of asset {}",
            identity.user_id, asset.id
        ))
        .into())
    }

    /// Cache invalidation scoped by asset id and by client; runs before
    /// the enclosing mutation returns.
    fn invalidate(&self, id: Uuid, client_id: Uuid) {
        self.cache.invalidate(&asset_key(id, client_id));
        self.cache.invalidate_prefix(&client_list_prefix(client_id));
    }

    fn lock_for(&self, id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.write_locks.lock().expect("write lock map poisoned");
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
