//! In-process cache used when Redis is disabled.

use super::CacheInterface;
use async_trait::async_trait;
use roster_core::{HealthCheck, HealthStatus, RosterResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local cache with per-entry expiry.
///
/// Clones share the same storage. Expiry uses the tokio clock, so tests
/// running with a paused clock can advance past a TTL deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let guard = self.entries.read().await;
        guard.values().filter(|entry| !entry.is_expired(now)).count()
    }

    /// Returns true when no live entry is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                Some(entry) if !entry.is_expired(now) => {
                    debug!("Cache hit for key '{}'", key);
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("Cache miss for key '{}'", key);
                    return Ok(None);
                }
            }
        }

        // Expired: drop it unless a writer replaced it in the meantime.
        let mut guard = self.entries.write().await;
        if guard.get(key).is_some_and(|entry| entry.is_expired(now)) {
            guard.remove(key);
        }
        debug!("Cache entry for key '{}' expired", key);
        Ok(None)
    }

    async fn set_raw(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        let entry = Entry {
            value: value.to_vec(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        debug!("Cached key '{}' with TTL {}s", key, ttl.as_secs());
        Ok(())
    }

    async fn invalidate_all(&self) -> RosterResult<()> {
        self.entries.write().await.clear();
        debug!("Cleared in-memory cache");
        Ok(())
    }

    async fn ping(&self) -> RosterResult<()> {
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for InMemoryCache {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::new();
        assert!(cache.get_raw("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_returns_same_bytes() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", b"[1,2,3]", TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), Some(b"[1,2,3]".to_vec()));
    }

    #[tokio::test]
    async fn test_set_replaces_prior_value() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", b"old", TTL).await.unwrap();
        cache.set_raw("k", b"new", TTL).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", b"v", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get_raw("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get_raw("k").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_every_key() {
        let cache = InMemoryCache::new();
        cache.set_raw("a", b"1", TTL).await.unwrap();
        cache.set_raw("b", b"2", TTL).await.unwrap();

        cache.invalidate_all().await.unwrap();

        assert!(cache.get_raw("a").await.unwrap().is_none());
        assert!(cache.get_raw("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = InMemoryCache::new();
        let other = cache.clone();
        cache.set_raw("k", b"v", TTL).await.unwrap();
        assert_eq!(other.len().await, 1);
    }
}
