//! TTL read cache for the Atelier asset pipeline.
//!
//! Sits in front of the query engine with two key spaces: single-record
//! lookups (`asset:{id}:{client_id}`) and client-scoped list queries
//! (`assets:{client_id}:{filter_signature}`). Mutating operations
//! invalidate both before returning, giving read-after-write consistency
//! for every mutation routed through the pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod keys;

pub use cache::{AssetCache, AssetCacheConfig, AssetCacheConfigBuilder, CacheEntry};
pub use keys::{asset_key, client_list_prefix, list_key};
