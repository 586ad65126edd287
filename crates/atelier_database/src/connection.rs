//! Database connection utilities.

use atelier_error::{DatabaseError, DatabaseErrorKind};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embedded SQL migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connection pool type used throughout the database crate.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build a connection pool for the given database URL.
///
/// # Errors
///
/// Returns an error if the pool cannot establish its initial connection.
pub fn establish_pool(database_url: &str) -> Result<PgPool, DatabaseError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build a connection pool from the `DATABASE_URL` environment variable.
pub fn establish_pool_from_env() -> Result<PgPool, DatabaseError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;
    establish_pool(&database_url)
}

/// Apply pending migrations.
pub fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut conn = pool
        .get()
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied database migrations");
    }
    Ok(())
}
