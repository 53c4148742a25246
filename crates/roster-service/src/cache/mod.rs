//! Caching infrastructure for the service layer.
//!
//! A byte-oriented cache abstraction with a Redis implementation and an
//! in-process fallback, plus the single-key user list cache built on top.

mod cache_interface;
pub mod cache_keys;
mod list_cache;
mod memory_cache;
mod redis_cache;

pub use cache_interface::CacheInterface;
pub use list_cache::UserListCache;
pub use memory_cache::InMemoryCache;
pub use redis_cache::{create_redis_pool, RedisCacheService};
