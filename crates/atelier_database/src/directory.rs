//! Diesel-backed client and owner directories.

use crate::connection::PgPool;
use crate::model::OwnerRow;
use crate::schema::{clients, owners};
use async_trait::async_trait;
use atelier_error::{AtelierResult, DatabaseError, DatabaseErrorKind};
use atelier_interface::{ClientDirectory, OwnerDirectory};
use diesel::prelude::*;
use uuid::Uuid;

fn join_error(e: tokio::task::JoinError) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Query(e.to_string()))
}

fn get_conn(
    pool: &PgPool,
) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>, DatabaseError>
{
    pool.get()
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Client directory backed by the `clients` table.
///
/// Slugs are stored lowercased, so case-insensitive resolution is an exact
/// match on the normalized input.
#[derive(Clone)]
pub struct DatabaseClientDirectory {
    pool: PgPool,
}

impl DatabaseClientDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientDirectory for DatabaseClientDirectory {
    async fn resolve_slug(&self, slug: &str) -> AtelierResult<Option<Uuid>> {
        let pool = self.pool.clone();
        let slug = slug.to_lowercase();

        let id = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            clients::table
                .filter(clients::slug.eq(slug))
                .select(clients::id)
                .first::<Uuid>(&mut conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;
        Ok(id)
    }

    async fn slug_of(&self, id: Uuid) -> AtelierResult<Option<String>> {
        let pool = self.pool.clone();

        let slug = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            clients::table
                .find(id)
                .select(clients::slug)
                .first::<String>(&mut conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;
        Ok(slug)
    }

    async fn exists(&self, id: Uuid) -> AtelierResult<bool> {
        Ok(self.slug_of(id).await?.is_some())
    }
}

/// Owner directory backed by the `owners` table.
#[derive(Clone)]
pub struct DatabaseOwnerDirectory {
    pool: PgPool,
    fallback_id: Uuid,
}

impl DatabaseOwnerDirectory {
    /// Create a new directory with the designated fallback owner id.
    pub fn new(pool: PgPool, fallback_id: Uuid) -> Self {
        Self { pool, fallback_id }
    }
}

#[async_trait]
impl OwnerDirectory for DatabaseOwnerDirectory {
    async fn exists(&self, id: Uuid) -> AtelierResult<bool> {
        let pool = self.pool.clone();

        let found = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            owners::table
                .find(id)
                .select(owners::id)
                .first::<Uuid>(&mut conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;
        Ok(found.is_some())
    }

    #[tracing::instrument(skip(self))]
    async fn ensure_fallback(&self) -> AtelierResult<Uuid> {
        let pool = self.pool.clone();
        let row = OwnerRow {
            id: self.fallback_id,
            display_name: "system-fallback".to_string(),
        };

        tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(owners::table)
                .values(&row)
                .on_conflict(owners::id)
                .do_nothing()
                .execute(&mut conn)
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;

        tracing::info!(owner_id = %self.fallback_id, "Ensured fallback owner");
        Ok(self.fallback_id)
    }
}
