//! TTL read cache implementation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: JsonValue,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Configuration for the asset cache.
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct AssetCacheConfig {
    /// Default TTL for cached entries (seconds)
    #[serde(default = "default_ttl")]
    default_ttl: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    300 // 5 minutes
}

fn default_max_size() -> usize {
    1000
}

fn default_enabled() -> bool {
    true
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    insertion_order: Vec<String>,
}

impl CacheInner {
    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.insertion_order.iter().position(|k| k == key) {
            self.insertion_order.remove(pos);
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(key) = self.insertion_order.first().cloned() {
            tracing::debug!(key = %key, "Evicting oldest cache entry");
            self.forget(&key);
        }
    }
}

/// TTL read cache in front of the query engine.
///
/// Keyed by [`crate::asset_key`] for single records and [`crate::list_key`]
/// for list queries. Interior locking makes it safe for concurrent readers;
/// invalidation takes the write lock and so acts as a write barrier.
///
/// # Example
///
/// ```
/// use atelier_cache::{asset_key, AssetCache, AssetCacheConfig};
/// use serde_json::json;
/// use uuid::Uuid;
///
/// let cache = AssetCache::new(AssetCacheConfig::default());
/// let key = asset_key(Uuid::new_v4(), Uuid::new_v4());
///
/// cache.insert(&key, json!({"name": "hero-banner"}), None);
/// assert!(cache.get(&key).is_some());
///
/// cache.invalidate(&key);
/// assert!(cache.get(&key).is_none());
/// ```
pub struct AssetCache {
    config: AssetCacheConfig,
    inner: RwLock<CacheInner>,
}

impl AssetCache {
    /// Create a new cache with configuration.
    pub fn new(config: AssetCacheConfig) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new AssetCache"
        );
        Self {
            config,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Get a cached value.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired
    /// - Cache is disabled
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        if !self.config.enabled {
            return None;
        }

        let inner = self.inner.read().expect("cache lock poisoned");
        let entry = inner.entries.get(key)?;
        if entry.is_expired() {
            tracing::debug!(key = %key, "Cache entry expired");
            return None;
        }

        tracing::debug!(key = %key, time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry.value.clone())
    }

    /// Insert a value with an optional TTL override (seconds).
    #[tracing::instrument(skip(self, value), fields(key = %key, ttl_seconds))]
    pub fn insert(&self, key: &str, value: JsonValue, ttl_seconds: Option<u64>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let ttl = Duration::from_secs(ttl_seconds.unwrap_or(self.config.default_ttl));
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
        };

        let mut inner = self.inner.write().expect("cache lock poisoned");

        // Evict if at capacity
        if inner.entries.len() >= self.config.max_size && !inner.entries.contains_key(key) {
            inner.evict_oldest();
        }

        if let Some(pos) = inner.insertion_order.iter().position(|k| k == key) {
            inner.insertion_order.remove(pos);
        }
        inner.insertion_order.push(key.to_string());
        inner.entries.insert(key.to_string(), entry);
    }

    /// Remove a single entry.
    pub fn invalidate(&self, key: &str) {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        inner.forget(key);
        tracing::debug!(key = %key, "Invalidated cache entry");
    }

    /// Remove every entry whose key starts with the given prefix.
    ///
    /// Used to drop all of a client's cached list queries on any mutation
    /// scoped to that client.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        let doomed: Vec<String> = inner
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &doomed {
            inner.forget(key);
        }
        if !doomed.is_empty() {
            tracing::debug!(prefix = %prefix, removed = doomed.len(), "Invalidated cache prefix");
        }
        doomed.len()
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        let doomed: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            inner.forget(key);
        }
        if !doomed.is_empty() {
            tracing::info!(removed = doomed.len(), "Cleaned up expired cache entries");
        }
        doomed.len()
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("cache lock poisoned");
        let count = inner.entries.len();
        inner.entries.clear();
        inner.insertion_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.read().expect("cache lock poisoned").entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new(AssetCacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expired_entries_are_never_returned() {
        let cache = AssetCache::default();
        cache.insert("asset:1", json!("v"), Some(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("asset:1").is_none());
    }

    #[test]
    fn prefix_invalidation_spares_other_clients() {
        let cache = AssetCache::default();
        cache.insert("assets:client-a:f1", json!(1), None);
        cache.insert("assets:client-a:f2", json!(2), None);
        cache.insert("assets:client-b:f1", json!(3), None);

        let removed = cache.invalidate_prefix("assets:client-a:");
        assert_eq!(removed, 2);
        assert!(cache.get("assets:client-a:f1").is_none());
        assert!(cache.get("assets:client-b:f1").is_some());
    }

    #[test]
    fn capacity_eviction_drops_the_oldest_entry() {
        let config = AssetCacheConfigBuilder::default()
            .default_ttl(300u64)
            .max_size(2usize)
            .enabled(true)
            .build()
            .unwrap();
        let cache = AssetCache::new(config);

        cache.insert("k1", json!(1), None);
        cache.insert("k2", json!(2), None);
        cache.insert("k3", json!(3), None);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("k1").is_none());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let config = AssetCacheConfigBuilder::default()
            .default_ttl(300u64)
            .max_size(10usize)
            .enabled(false)
            .build()
            .unwrap();
        let cache = AssetCache::new(config);

        cache.insert("k", json!(1), None);
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn cleanup_removes_only_expired_entries() {
        let cache = AssetCache::default();
        cache.insert("stale", json!(1), Some(0));
        cache.insert("fresh", json!(2), Some(300));
        std::thread::sleep(Duration::from_millis(5));

        let removed = cache.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }
}
