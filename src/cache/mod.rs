//! Response cache for read operations.
//!
//! Bounded key/value store with per-entry expiry and least-recently-used
//! eviction. Keys are strings built from the resource family, the resource
//! id and every parameter that changes the response shape (notably the
//! granularity level), so two logically identical reads share an entry and
//! reads differing in granularity do not.
//!
//! Pattern invalidation uses SUBSTRING matching: `invalidate_pattern("world:42")`
//! removes every key containing `"world:42"`, including `"world:421:g1"`.
//! Callers that need an exact id scope terminate the pattern with the key
//! delimiter, e.g. `"world:42:"`.

use crate::clock::Clock;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for the response cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached entries before LRU eviction kicks in
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Default TTL in seconds for families without an override
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

fn default_max_entries() -> usize {
    500
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    /// Default TTL for a resource family.
    ///
    /// Identity data is effectively static within a session; categories
    /// change rarely; worlds and articles use the configured default.
    pub fn ttl_for(&self, family: &str) -> Duration {
        match family {
            "identity" => Duration::from_secs(3600),
            "category" => Duration::from_secs(600),
            _ => Duration::from_secs(self.default_ttl_secs),
        }
    }

    /// The configured default TTL.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

/// Build the cache key for a point read.
///
/// The granularity level is part of the key because it changes the response
/// shape. The trailing component keeps id prefixes unambiguous:
/// `"world:42:g1"` is never a substring-prefix match for `"world:421:g1"`
/// when invalidating with `"world:42:"`.
pub fn cache_key(family: &str, id: &str, granularity: i8) -> String {
    format!("{}:{}:g{}", family, id, granularity)
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    // Most-recently-used last. Every cached key appears exactly once.
    access_order: Vec<String>,
}

/// Bounded TTL + LRU response cache.
///
/// All methods take `&self`; the store is guarded by a mutex so the
/// read-modify-write sequences (expiry check + LRU promotion) stay safe
/// under parallel callers, not just cooperative ones. None of the
/// operations fail: a missing key is an expected outcome, not an error.
pub struct ResponseCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<CacheInner>,
}

impl ResponseCache {
    /// Create a new cache with the given configuration and clock.
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            max_entries = config.max_entries,
            default_ttl_secs = config.default_ttl_secs,
            "Creating response cache"
        );
        Self {
            config,
            clock,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                access_order: Vec::new(),
            }),
        }
    }

    /// Get a cached value, promoting the key to most-recently-used.
    ///
    /// Expired entries are treated as absent and removed on access.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        match inner.entries.get(key) {
            Some(entry) if entry.expires_at > now => {}
            Some(_) => {
                tracing::debug!(key, "Cache entry expired, removing");
                inner.remove(key);
                return None;
            }
            None => return None,
        }

        inner.promote(key);
        let value = inner.entries.get(key).map(|e| e.value.clone());
        tracing::debug!(key, "Cache hit");
        value
    }

    /// Insert or overwrite a value with the given TTL.
    ///
    /// Evicts least-recently-used entries until the store fits the
    /// configured capacity.
    pub fn set(&self, key: &str, value: Value, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut inner = self.inner.lock();

        inner.entries.insert(key.to_string(), CacheEntry { value, expires_at });
        inner.promote(key);

        while inner.entries.len() > self.config.max_entries {
            if let Some(evicted) = inner.evict_lru() {
                tracing::debug!(key = %evicted, "Evicted LRU cache entry");
            } else {
                break;
            }
        }
    }

    /// Remove a single entry; no-op when absent.
    pub fn invalidate(&self, key: &str) {
        self.inner.lock().remove(key);
    }

    /// Remove every key containing `pattern` as a substring.
    ///
    /// Returns the number of entries removed. Used after mutating calls to
    /// drop now-stale reads at every granularity level.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut inner = self.inner.lock();
        let matching: Vec<String> = inner
            .entries
            .keys()
            .filter(|k| k.contains(pattern))
            .cloned()
            .collect();

        for key in &matching {
            inner.remove(key);
        }

        if !matching.is_empty() {
            tracing::debug!(pattern, removed = matching.len(), "Invalidated cache entries");
        }
        matching.len()
    }

    /// Empty the store unconditionally.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.access_order.clear();
    }

    /// Number of cached entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl CacheInner {
    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            self.access_order.remove(pos);
        }
    }

    fn promote(&mut self, key: &str) {
        if let Some(pos) = self.access_order.iter().position(|k| k == key) {
            let key = self.access_order.remove(pos);
            self.access_order.push(key);
        } else {
            self.access_order.push(key.to_string());
        }
    }

    fn evict_lru(&mut self) -> Option<String> {
        if self.access_order.is_empty() {
            return None;
        }
        let key = self.access_order.remove(0);
        self.entries.remove(&key);
        Some(key)
    }
}
