//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use roster_core::{HealthCheck, RosterResult};
use std::time::Duration;

/// Cache backend storing opaque byte values under string keys.
///
/// Values are kept as raw bytes so a cached response can be returned
/// exactly as it was written.
#[async_trait]
pub trait CacheInterface: HealthCheck + Send + Sync {
    /// Get a raw value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> RosterResult<Option<Vec<u8>>>;

    /// Set a raw value in the cache, replacing any prior value, with a TTL.
    async fn set_raw(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()>;

    /// Remove every entry in the cache, not only keys written by this service.
    async fn invalidate_all(&self) -> RosterResult<()>;

    /// Round-trips to the backend.
    async fn ping(&self) -> RosterResult<()>;
}
