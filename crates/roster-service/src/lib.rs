//! # Roster Service
//!
//! Service layer for Roster. Owns the list cache policy: writes go to the
//! store and then clear the cache, list reads go through the cache.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::UserServiceImpl;
pub use user_service::*;
