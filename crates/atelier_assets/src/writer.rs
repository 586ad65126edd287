//! Persistence writer.
//!
//! The single consolidated write path for asset records. Referential
//! integrity gets exactly one bounded, observable corrective action; there
//! is no cascading retry and no silent null-owner fallback.

use atelier_core::Asset;
use atelier_error::{
    AtelierError, AtelierErrorKind, AtelierResult, IntegrityError, IntegrityErrorKind,
    ValidationError,
};
use atelier_interface::{AssetRepository, ClientDirectory, OwnerDirectory};
use atelier_storage::ByteStore;
use std::sync::Arc;

fn is_owner_fk_violation(error: &AtelierError) -> bool {
    match error.kind() {
        AtelierErrorKind::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

/// Turns a fully populated in-memory asset into a durable record.
pub struct PersistenceWriter {
    repository: Arc<dyn AssetRepository>,
    clients: Arc<dyn ClientDirectory>,
    owners: Arc<dyn OwnerDirectory>,
    store: Arc<dyn ByteStore>,
    relaxed: bool,
}

impl PersistenceWriter {
    /// Create a writer over the given collaborators.
    pub fn new(
        repository: Arc<dyn AssetRepository>,
        clients: Arc<dyn ClientDirectory>,
        owners: Arc<dyn OwnerDirectory>,
        store: Arc<dyn ByteStore>,
        relaxed: bool,
    ) -> Self {
        Self {
            repository,
            clients,
            owners,
            store,
            relaxed,
        }
    }

    /// Persist a new asset record.
    ///
    /// On any terminal failure the asset's already-written byte-store
    /// artifacts are deleted best-effort, so a failed ingestion leaves no
    /// orphaned bytes.
    #[tracing::instrument(skip(self, asset), fields(id = %asset.id, client_id = %asset.client_id))]
    pub async fn persist_new(&self, asset: &mut Asset) -> AtelierResult<()> {
        let result = self.write_record(asset).await;
        if result.is_err() {
            self.cleanup_artifacts(asset).await;
        }
        result
    }

    async fn write_record(&self, asset: &mut Asset) -> AtelierResult<()> {
        if asset.url.trim().is_empty() {
            return Err(ValidationError::field("url", "must not be empty").into());
        }

        let mut corrected = false;
        if !self.relaxed {
            if !self.clients.exists(asset.client_id).await? {
                return Err(IntegrityError::new(IntegrityErrorKind::ClientUnresolvable {
                    client: asset.client_id.to_string(),
                    reason: "not present in client directory".to_string(),
                })
                .into());
            }
            if !self.owners.exists(asset.owner_id).await? {
                // The one corrective action: substitute the fallback owner
                // up front rather than waiting for the insert to bounce.
                let original = asset.owner_id;
                let fallback = self.owners.ensure_fallback().await?;
                tracing::warn!(
                    owner_id = %original,
                    fallback_id = %fallback,
                    "Owner unresolvable, substituting fallback owner"
                );
                asset.owner_id = fallback;
                corrected = true;
            }
        }

        match self.repository.insert(asset).await {
            Ok(()) => Ok(()),
            Err(error) if is_owner_fk_violation(&error) && !corrected => {
                // Lost a race with an owner removal: retry exactly once
                // against the fallback owner.
                let original = asset.owner_id;
                let fallback = self.owners.ensure_fallback().await?;
                tracing::warn!(
                    owner_id = %original,
                    fallback_id = %fallback,
                    "Insert hit owner foreign key, retrying with fallback owner"
                );
                asset.owner_id = fallback;
                self.repository.insert(asset).await.map_err(|retry_error| {
                    IntegrityError::new(IntegrityErrorKind::OwnerUnresolvable {
                        owner: original.to_string(),
                        reason: retry_error.to_string(),
                    })
                    .into()
                })
            }
            Err(error) if is_owner_fk_violation(&error) => {
                Err(IntegrityError::new(IntegrityErrorKind::OwnerUnresolvable {
                    owner: asset.owner_id.to_string(),
                    reason: error.to_string(),
                })
                .into())
            }
            Err(error) => Err(error),
        }
    }

    /// Best-effort removal of an asset's byte-store artifacts.
    pub async fn cleanup_artifacts(&self, asset: &Asset) {
        let paths = [
            Some(asset.url.as_str()),
            asset.thumbnail_url.as_deref(),
            asset.preview_url.as_deref(),
        ];
        for path in paths.into_iter().flatten() {
            if path.is_empty() {
                continue;
            }
            if let Err(error) = self.store.delete(path).await {
                tracing::warn!(path = %path, error = %error, "Orphan cleanup failed");
            } else {
                tracing::info!(path = %path, "Cleaned up orphaned artifact");
            }
        }
    }
}
