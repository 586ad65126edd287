//! Diesel-backed asset repository.

use crate::connection::PgPool;
use crate::model::AssetRow;
use crate::schema::assets;
use async_trait::async_trait;
use atelier_core::Asset;
use atelier_error::{AtelierResult, DatabaseError, DatabaseErrorKind};
use atelier_interface::AssetRepository;
use atelier_query::{AssetFilter, QueryPage};
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

/// Database-backed asset repository.
///
/// Scalar predicates (client, type, favourite, date range) narrow in SQL;
/// set-containment and search predicates, sorting, and pagination run
/// through the shared query engine so results agree exactly with the
/// in-memory repository.
#[derive(Clone)]
pub struct DatabaseAssetRepository {
    pool: PgPool,
}

impl DatabaseAssetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for DatabaseAssetRepository {
    #[tracing::instrument(skip(self, asset), fields(id = %asset.id))]
    async fn insert(&self, asset: &Asset) -> AtelierResult<()> {
        let row = AssetRow::try_from(asset)?;
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::insert_into(assets::table)
                .values(&row)
                .execute(&mut conn)
                .map_err(DatabaseError::from)?;
            Ok::<(), DatabaseError>(())
        })
        .await
        .map_err(join_error)??;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> AtelierResult<Option<Asset>> {
        let pool = self.pool.clone();

        let row = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            assets::table
                .find(id)
                .first::<AssetRow>(&mut conn)
                .optional()
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;

        match row {
            Some(row) => Ok(Some(Asset::try_from(row)?)),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, asset), fields(id = %asset.id))]
    async fn update(&self, asset: &Asset) -> AtelierResult<()> {
        let row = AssetRow::try_from(asset)?;
        let pool = self.pool.clone();
        let id = asset.id;

        tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let affected = diesel::update(assets::table.find(id))
                .set(&row)
                .execute(&mut conn)
                .map_err(DatabaseError::from)?;
            if affected == 0 {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound));
            }
            Ok(())
        })
        .await
        .map_err(join_error)??;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AtelierResult<bool> {
        let pool = self.pool.clone();

        let affected = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            diesel::delete(assets::table.find(id))
                .execute(&mut conn)
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;
        Ok(affected > 0)
    }

    #[tracing::instrument(skip(self, filter))]
    async fn query(&self, client_id: Uuid, filter: &AssetFilter) -> AtelierResult<QueryPage> {
        let pool = self.pool.clone();
        let narrowed = filter.clone();

        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = get_conn(&pool)?;
            let mut query = assets::table
                .filter(assets::client_id.eq(client_id))
                .into_boxed();
            if let Some(asset_type) = narrowed.asset_type {
                query = query.filter(assets::asset_type.eq(asset_type.as_str().to_string()));
            }
            if narrowed.favourites_only {
                query = query.filter(assets::is_favourite.eq(true));
            }
            if let Some(start) = narrowed.start_date {
                query = query.filter(assets::created_at.ge(start));
            }
            if let Some(end) = narrowed.end_date {
                query = query.filter(assets::created_at.le(end));
            }
            query
                .load::<AssetRow>(&mut conn)
                .map_err(DatabaseError::from)
        })
        .await
        .map_err(join_error)??;

        let candidates = rows
            .into_iter()
            .map(Asset::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(atelier_query::execute(candidates, filter))
    }
}
