//! Reads `AppConfig` from TOML files and the environment.
//!
//! Later sources win:
//!
//! 1. `{dir}/default.toml`
//! 2. `{dir}/{ROSTER_ENVIRONMENT}.toml` (`development` when unset)
//! 3. `{dir}/local.toml`
//! 4. `ROSTER__SECTION__KEY` variables, e.g. `ROSTER__SERVER__PORT=9000`
//! 5. `DATABASE_URL`, `REDIS_URL`, `REDIS_HOST` / `REDIS_PORT`
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::{AppConfig, RedisConfig};
use config::{Config, Environment, File};
use roster_core::RosterError;
use std::path::Path;
use tracing::{debug, info, warn};

pub const ENV_PREFIX: &str = "ROSTER";

/// Directory read by [`load_default`].
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Loads and validates the configuration from [`DEFAULT_CONFIG_DIR`].
pub fn load_default() -> Result<AppConfig, RosterError> {
    load(DEFAULT_CONFIG_DIR)
}

/// Loads and validates the configuration found in `dir`.
pub fn load(dir: impl AsRef<Path>) -> Result<AppConfig, RosterError> {
    let dir = dir.as_ref();

    if dotenvy::dotenv().is_err() {
        debug!("No .env file loaded");
    }

    let environment =
        std::env::var("ROSTER_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    info!(%environment, dir = %dir.display(), "Loading configuration");

    let mut builder = Config::builder();
    for name in ["default", environment.as_str(), "local"] {
        let path = dir.join(format!("{}.toml", name));
        if path.exists() {
            debug!("Reading {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    let mut config: AppConfig = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|raw| raw.try_deserialize())
        .map_err(|e| invalid(e.to_string()))?;

    apply_conventional_env(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), RosterError> {
    if config.database.url.is_empty() {
        return Err(invalid("database.url must not be empty"));
    }
    if config.redis.enabled && config.redis.url.is_empty() {
        return Err(invalid("redis.url must not be empty while redis.enabled is true"));
    }
    if config.cache.list_ttl_secs == 0 {
        return Err(invalid("cache.list_ttl_secs must be greater than zero"));
    }
    if !config.redis.enabled {
        warn!("Redis is disabled; the user list is cached in-process");
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> RosterError {
    RosterError::Configuration(message.into())
}

/// Applies the unprefixed variables commonly set by container orchestrators.
///
/// These win over file and `ROSTER__` values.
pub fn apply_conventional_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), RosterError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
        debug!("Using DATABASE_URL from environment");
        config.database.url = url;
    }

    if let Some(url) = lookup("REDIS_URL").filter(|v| !v.is_empty()) {
        debug!("Using REDIS_URL from environment");
        config.redis.url = url;
    } else if let Some(host) = lookup("REDIS_HOST").filter(|v| !v.is_empty()) {
        let port = match lookup("REDIS_PORT") {
            Some(port) => port.parse::<u16>().map_err(|_| {
                invalid(format!("REDIS_PORT is not a port number: {}", port))
            })?,
            None => 6379,
        };
        config.redis.url = RedisConfig::url_for(&host, port);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_override() {
        let mut config = AppConfig::default();
        apply_conventional_env(&mut config, lookup_from(&[("DATABASE_URL", "postgres://db/app")]))
            .unwrap();
        assert_eq!(config.database.url, "postgres://db/app");
    }

    #[test]
    fn test_redis_host_and_port_override() {
        let mut config = AppConfig::default();
        apply_conventional_env(
            &mut config,
            lookup_from(&[("REDIS_HOST", "redis"), ("REDIS_PORT", "6380")]),
        )
        .unwrap();
        assert_eq!(config.redis.url, "redis://redis:6380");
    }

    #[test]
    fn test_redis_host_defaults_port() {
        let mut config = AppConfig::default();
        apply_conventional_env(&mut config, lookup_from(&[("REDIS_HOST", "cache")])).unwrap();
        assert_eq!(config.redis.url, "redis://cache:6379");
    }

    #[test]
    fn test_redis_url_wins_over_host() {
        let mut config = AppConfig::default();
        apply_conventional_env(
            &mut config,
            lookup_from(&[("REDIS_URL", "redis://primary:6379/2"), ("REDIS_HOST", "other")]),
        )
        .unwrap();
        assert_eq!(config.redis.url, "redis://primary:6379/2");
    }

    #[test]
    fn test_invalid_redis_port_is_rejected() {
        let mut config = AppConfig::default();
        let result = apply_conventional_env(
            &mut config,
            lookup_from(&[("REDIS_HOST", "redis"), ("REDIS_PORT", "not-a-port")]),
        );
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.list_ttl_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_loads_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9100\n\n[cache]\nlist_ttl_secs = 15\n",
        )
        .unwrap();

        let config = load(dir.path()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.cache.list_ttl_secs, 15);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cache]\nlist_ttl_secs = 0\n").unwrap();

        let result = load(dir.path());
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }
}
