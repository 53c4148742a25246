//! Single-key cache for the serialized user list.

use super::{cache_keys, CacheInterface};
use roster_core::RosterResult;
use std::sync::Arc;
use std::time::Duration;

/// Read-through cache for the full user list.
///
/// Holds at most one artifact under [`cache_keys::USER_LIST`]. Any write to
/// the user table must call [`invalidate_all`](Self::invalidate_all).
#[derive(Clone)]
pub struct UserListCache {
    backend: Arc<dyn CacheInterface>,
}

impl UserListCache {
    /// Wraps a cache backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheInterface>) -> Self {
        Self { backend }
    }

    /// Returns the cached list bytes, or `None` on a miss or after expiry.
    pub async fn get_list(&self) -> RosterResult<Option<Vec<u8>>> {
        self.backend.get_raw(cache_keys::USER_LIST).await
    }

    /// Stores the serialized list, replacing any prior value.
    pub async fn set_list(&self, bytes: &[u8], ttl: Duration) -> RosterResult<()> {
        self.backend.set_raw(cache_keys::USER_LIST, bytes, ttl).await
    }

    /// Removes every cached entry in the backend.
    pub async fn invalidate_all(&self) -> RosterResult<()> {
        self.backend.invalidate_all().await
    }
}

impl std::fmt::Debug for UserListCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserListCache")
            .field("key", &cache_keys::USER_LIST)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;

    #[tokio::test]
    async fn test_list_round_trip_uses_fixed_key() {
        let backend = InMemoryCache::new();
        let cache = UserListCache::new(Arc::new(backend.clone()));

        assert!(cache.get_list().await.unwrap().is_none());
        cache.set_list(b"[]", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_list().await.unwrap(), Some(b"[]".to_vec()));
        assert_eq!(
            backend.get_raw(cache_keys::USER_LIST).await.unwrap(),
            Some(b"[]".to_vec())
        );
    }

    #[tokio::test]
    async fn test_invalidate_all_removes_unrelated_keys() {
        let backend = InMemoryCache::new();
        backend.set_raw("other", b"x", Duration::from_secs(60)).await.unwrap();
        let cache = UserListCache::new(Arc::new(backend.clone()));
        cache.set_list(b"[]", Duration::from_secs(60)).await.unwrap();

        cache.invalidate_all().await.unwrap();

        assert!(cache.get_list().await.unwrap().is_none());
        assert!(backend.is_empty().await);
    }
}
