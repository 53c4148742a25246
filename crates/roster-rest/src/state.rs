//! Application state for Axum handlers.

use roster_core::HealthCheck;
use roster_service::UserService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Backends checked by `/ready`.
    pub health_checks: Arc<Vec<Arc<dyn HealthCheck>>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            user_service,
            health_checks: Arc::new(health_checks),
        }
    }
}
