//! Cache port
//!
//! The listing service talks to its cache only through `CachePort`, so the
//! backing store can be swapped (or stubbed in tests) without touching the
//! search flow.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;

/// Key-value cache with per-entry TTL.
#[async_trait]
pub trait CachePort: Send + Sync {
    /// Returns the payload stored under `key` if present and not expired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` for `ttl`.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

// == Memory Cache ==
/// In-process cache shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter snapshot. Expired entries are swept first so the entry count
    /// only reflects live payloads.
    pub async fn stats(&self) -> CacheStats {
        let mut store = self.store.write().await;
        let swept = store.cleanup_expired();
        if swept > 0 {
            debug!(swept, "Dropped expired cache entries");
        }
        store.stats()
    }

    /// Drops every cached payload, returning how many were removed.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl CachePort for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        // Write lock: reads update stats and drop expired entries
        self.store.write().await.get(key)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), value, ttl.as_secs())
    }
}
