//! Record store implementations for the Atelier asset pipeline.
//!
//! Two implementations of the [`atelier_interface::AssetRepository`] seam:
//! a Diesel/PostgreSQL repository for production and an in-memory
//! repository for tests and relaxed/offline mode. Both delegate predicate
//! evaluation, sorting, and pagination to `atelier_query`, so a deployment
//! can switch backends without changing query semantics.

#![forbid(unsafe_code)]

mod connection;
mod directory;
mod memory;
mod model;
mod repository;
pub mod schema;

pub use connection::{establish_pool, establish_pool_from_env, run_migrations, PgPool, MIGRATIONS};
pub use directory::{DatabaseClientDirectory, DatabaseOwnerDirectory};
pub use memory::MemoryAssetRepository;
pub use model::{AssetRow, ClientRow, OwnerRow};
pub use repository::DatabaseAssetRepository;
