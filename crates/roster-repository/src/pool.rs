//! PostgreSQL connection pool, schema migrations and the database health check.

use async_trait::async_trait;
use roster_config::DatabaseConfig;
use roster_core::{HealthCheck, HealthStatus, RosterError, RosterResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// What repositories and the startup code need from a pool.
#[async_trait]
pub trait DatabasePoolInterface: Send + Sync {
    fn inner(&self) -> &PgPool;

    /// Round-trips `SELECT 1`.
    async fn health_check(&self) -> RosterResult<()>;

    /// Applies the embedded `migrations/` directory. Already-applied
    /// versions are skipped, so this is safe on every start.
    async fn run_migrations(&self) -> RosterResult<()>;

    /// Waits for checked-out connections to return, then closes them all.
    async fn close(&self);
}

/// Owns the process-wide `PgPool`.
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Opens the pool and waits for the first `min_connections` to succeed.
    pub async fn new(config: &DatabaseConfig) -> RosterResult<Self> {
        info!(
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("PostgreSQL connection failed: {}", e);
                RosterError::Database(format!("cannot connect: {}", e))
            })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check(&self) -> RosterResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn run_migrations(&self) -> RosterResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RosterError::Database(format!("migration failed: {}", e)))?;
        info!("Schema is up to date");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        if self.pool.is_closed() {
            return HealthStatus::Unhealthy("pool is closed".to_string());
        }
        match DatabasePoolInterface::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("idle", &self.pool.num_idle())
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

/// Opens the pool and wraps it for sharing between the repository and
/// the readiness check.
pub async fn create_pool(config: &DatabaseConfig) -> RosterResult<Arc<DatabasePool>> {
    DatabasePool::new(config).await.map(Arc::new)
}
