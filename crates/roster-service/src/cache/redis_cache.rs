//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use roster_config::RedisConfig;
use roster_core::{HealthCheck, HealthStatus, RosterError, RosterResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Creates a Redis connection pool from configuration.
///
/// The pool connects lazily; use [`CacheInterface::ping`] to verify the
/// server is reachable.
pub fn create_redis_pool(config: &RedisConfig) -> RosterResult<Pool> {
    let mut pool_config = Config::from_url(config.url.clone());
    pool_config.pool = Some(PoolConfig::new(config.pool_size));

    pool_config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| RosterError::Configuration(format!("Invalid Redis configuration: {}", e)))
}

/// Redis-based cache service.
#[derive(Clone)]
pub struct RedisCacheService {
    pool: Arc<Pool>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    /// Create a cache service with its own pool built from configuration.
    pub fn from_config(config: &RedisConfig) -> RosterResult<Self> {
        let pool = create_redis_pool(config)?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Closes the pool. Connections checked out afterwards fail.
    pub fn close(&self) {
        info!("Closing Redis connection pool...");
        self.pool.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> RosterResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| RosterError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    async fn get_raw(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| RosterError::Cache(format!("Failed to get key '{}': {}", key, e)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| RosterError::Cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn invalidate_all(&self) -> RosterResult<()> {
        let mut conn = self.get_conn().await?;

        // Clears the selected logical database only.
        let _: () = deadpool_redis::redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| RosterError::Cache(format!("Failed to flush cache: {}", e)))?;

        debug!("Flushed Redis database");
        Ok(())
    }

    async fn ping(&self) -> RosterResult<()> {
        let mut conn = self.get_conn().await?;
        let _: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| RosterError::Cache(format!("Ping failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for RedisCacheService {
    fn name(&self) -> &str {
        "redis"
    }

    async fn check(&self) -> HealthStatus {
        if self.is_closed() {
            return HealthStatus::Unhealthy("pool is closed".to_string());
        }
        match self.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisCacheService")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RedisConfig {
        RedisConfig {
            url: url.to_string(),
            pool_size: 2,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_pool_is_created_without_connecting() {
        let cache = RedisCacheService::from_config(&config("redis://127.0.0.1:1")).unwrap();
        assert_eq!(cache.pool.status().size, 0);
    }

    #[test]
    fn test_invalid_url_is_a_configuration_error() {
        let result = RedisCacheService::from_config(&config("not a url"));
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_closed_pool_reports_cache_error() {
        let cache = RedisCacheService::from_config(&config("redis://127.0.0.1:1")).unwrap();
        cache.close();

        let result = cache.get_raw("key").await;
        assert!(matches!(result, Err(RosterError::Cache(_))));
        assert!(cache.is_closed());
        assert!(cache.check().await.is_unhealthy());
    }
}
