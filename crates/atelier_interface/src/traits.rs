//! Trait definitions for external collaborators and the record store.

use async_trait::async_trait;
use atelier_core::{Asset, Identity};
use atelier_error::AtelierResult;
use atelier_query::{AssetFilter, QueryPage};
use uuid::Uuid;

/// Resolves the identity of the current caller.
///
/// The pipeline only needs an opaque user id and an owner check; real
/// deployments inject an implementation backed by the identity service,
/// tests and relaxed/offline mode inject [`crate::StaticIdentity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity of the caller for the current request.
    async fn current(&self) -> AtelierResult<Identity>;
}

/// Pure slug/id lookup over the client directory.
///
/// Reads follow a "not found ⇒ empty result" policy; writes follow
/// "not found ⇒ reject". Slugs are matched case-insensitively.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Resolve a human-readable slug to a client id.
    async fn resolve_slug(&self, slug: &str) -> AtelierResult<Option<Uuid>>;

    /// Resolve a client id back to its slug.
    async fn slug_of(&self, id: Uuid) -> AtelierResult<Option<String>>;

    /// Whether a client id resolves.
    async fn exists(&self, id: Uuid) -> AtelierResult<bool>;
}

/// Owner resolution plus the single bounded corrective action.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    /// Whether an owner id resolves.
    async fn exists(&self, id: Uuid) -> AtelierResult<bool>;

    /// Create-or-reuse the designated fallback owner and return its id.
    ///
    /// Invoked at most once per failed insert by the persistence writer.
    async fn ensure_fallback(&self) -> AtelierResult<Uuid>;
}

/// Durable record store for assets.
///
/// The persistence writer is the only component that writes through this
/// trait; each asset id is an independent unit of work.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert a new record.
    ///
    /// Surfaces a foreign-key violation as a database error so the writer
    /// can apply its bounded owner fallback.
    async fn insert(&self, asset: &Asset) -> AtelierResult<()>;

    /// Fetch a record by id.
    async fn fetch(&self, id: Uuid) -> AtelierResult<Option<Asset>>;

    /// Replace an existing record.
    async fn update(&self, asset: &Asset) -> AtelierResult<()>;

    /// Delete a record; `false` when it did not exist.
    async fn delete(&self, id: Uuid) -> AtelierResult<bool>;

    /// Evaluate a filter for one client, returning the page and the total
    /// match count independent of pagination.
    async fn query(&self, client_id: Uuid, filter: &AssetFilter) -> AtelierResult<QueryPage>;
}
