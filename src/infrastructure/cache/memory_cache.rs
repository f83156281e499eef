//! In-process cache with per-entry expiry.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Concurrent in-memory cache.
///
/// Used by tests and by embedders that wire the services themselves;
/// [`crate::bootstrap`] only ever selects Redis or [`super::NullCache`].
/// Entries are not shared across processes.
///
/// Expired entries are dropped when their key is read, or in bulk by
/// [`MemoryCache::purge_expired`]. A long-lived embedder whose keys are not
/// re-read should call it periodically.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, (String, Instant)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, expires_at)| now < *expires_at);
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        let live = self.entries.get(key).and_then(|entry| {
            let (value, expires_at) = entry.value();
            (now < *expires_at).then(|| value.clone())
        });

        if live.is_none() {
            self.entries.remove_if(key, |_, (_, expires_at)| now >= *expires_at);
        }

        Ok(live)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
