//! Dependency wiring.
//!
//! Backend handles are acquired once here and passed to the components
//! that need them as `Arc<dyn Trait>`. [`AppModule::shutdown`] releases
//! them after the server stops.

use roster_config::AppConfig;
use roster_core::{HealthCheck, RosterError, RosterResult};
use roster_repository::{create_pool, DatabasePool, DatabasePoolInterface, PgUserRepository, UserRepository};
use roster_rest::AppState;
use roster_service::{
    CacheInterface, InMemoryCache, RedisCacheService, UserListCache, UserService, UserServiceImpl,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// The assembled component graph.
pub struct AppModule {
    user_service: Arc<dyn UserService>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    database_pool: Option<Arc<DatabasePool>>,
    redis: Option<RedisCacheService>,
}

impl AppModule {
    /// Resolves the user service.
    pub fn user_service(&self) -> Arc<dyn UserService> {
        Arc::clone(&self.user_service)
    }

    /// Backends checked by the readiness endpoint.
    pub fn health_checks(&self) -> Vec<Arc<dyn HealthCheck>> {
        self.health_checks.clone()
    }

    /// Builds the shared state for the REST router.
    pub fn app_state(&self) -> AppState {
        AppState::new(self.user_service(), self.health_checks())
    }

    /// Releases the backend connections.
    pub async fn shutdown(&self) {
        release_backends(self.redis.as_ref(), self.database_pool.as_ref()).await;
    }
}

impl std::fmt::Debug for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModule")
            .field("health_checks", &self.health_checks.len())
            .field("database_pool", &self.database_pool.is_some())
            .field("redis", &self.redis.is_some())
            .finish()
    }
}

/// Builder for [`AppModule`].
pub struct AppModuleBuilder {
    user_repository: Option<Arc<dyn UserRepository>>,
    database_pool: Option<Arc<DatabasePool>>,
    cache: Option<(Arc<dyn CacheInterface>, Arc<dyn HealthCheck>)>,
    redis: Option<RedisCacheService>,
    list_ttl: Duration,
}

impl AppModuleBuilder {
    /// Creates a new builder with the default list TTL.
    pub fn new() -> Self {
        Self {
            user_repository: None,
            database_pool: None,
            cache: None,
            redis: None,
            list_ttl: Duration::from_secs(60),
        }
    }

    /// Uses PostgreSQL as the store.
    pub fn with_database_pool(mut self, pool: Arc<DatabasePool>) -> Self {
        let interface: Arc<dyn DatabasePoolInterface> = pool.clone();
        self.user_repository = Some(Arc::new(PgUserRepository::new(interface)));
        self.database_pool = Some(pool);
        self
    }

    /// Uses an arbitrary store implementation.
    pub fn with_user_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.user_repository = Some(repository);
        self
    }

    /// Uses Redis as the cache backend.
    pub fn with_redis(mut self, redis: RedisCacheService) -> Self {
        self = self.with_cache(Arc::new(redis.clone()));
        self.redis = Some(redis);
        self
    }

    /// Uses an arbitrary cache backend.
    pub fn with_cache<C>(mut self, cache: Arc<C>) -> Self
    where
        C: CacheInterface + 'static,
    {
        let health: Arc<dyn HealthCheck> = cache.clone();
        let cache: Arc<dyn CacheInterface> = cache;
        self.cache = Some((cache, health));
        self
    }

    /// Sets the lifetime of the cached user list.
    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    /// Closes every backend handed to the builder so far. Used when
    /// startup fails before a module exists.
    pub async fn release(&self) {
        release_backends(self.redis.as_ref(), self.database_pool.as_ref()).await;
    }

    /// Builds the module. A store is required; the cache falls back to an
    /// in-process one.
    pub fn build(self) -> RosterResult<AppModule> {
        let user_repository = self
            .user_repository
            .ok_or_else(|| RosterError::Configuration("No user repository configured".to_string()))?;

        let (cache, cache_health) = match self.cache {
            Some(cache) => cache,
            None => {
                let memory = Arc::new(InMemoryCache::new());
                let health: Arc<dyn HealthCheck> = memory.clone();
                (memory as Arc<dyn CacheInterface>, health)
            }
        };

        let mut health_checks: Vec<Arc<dyn HealthCheck>> = Vec::new();
        if let Some(pool) = &self.database_pool {
            health_checks.push(pool.clone());
        }
        health_checks.push(cache_health);

        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            user_repository,
            UserListCache::new(cache),
            self.list_ttl,
        ));

        Ok(AppModule {
            user_service,
            health_checks,
            database_pool: self.database_pool,
            redis: self.redis,
        })
    }
}

impl Default for AppModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn release_backends(redis: Option<&RedisCacheService>, pool: Option<&Arc<DatabasePool>>) {
    if let Some(redis) = redis {
        redis.close();
    }
    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("Backend connections released");
}

/// Connects to every backend named in the configuration and builds the module.
///
/// Redis is checked before the PostgreSQL pool is opened. If a later step
/// fails, whatever was already opened is closed before the error returns.
pub async fn build_app_module(config: &AppConfig) -> RosterResult<AppModule> {
    let mut builder = AppModuleBuilder::new().with_list_ttl(config.cache.list_ttl());

    if config.redis.enabled {
        let redis = RedisCacheService::from_config(&config.redis)?;
        builder = builder.with_redis(redis.clone());
        if let Err(e) = redis.ping().await {
            builder.release().await;
            return Err(e);
        }
        info!("Connected to Redis");
    } else {
        warn!("Redis disabled, using in-process list cache");
    }

    let db_pool = match create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            builder.release().await;
            return Err(e);
        }
    };
    builder = builder.with_database_pool(Arc::clone(&db_pool));

    if config.database.run_migrations {
        if let Err(e) = db_pool.run_migrations().await {
            builder.release().await;
            return Err(e);
        }
    } else {
        info!("Skipping database migrations");
    }

    builder.build()
}
