//! Liveness and readiness endpoints.

use crate::state::AppState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use roster_core::HealthStatus;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}

/// Status of one backend checked by the readiness check.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// `/health`, `/live` and `/ready`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Answers as long as the process can serve HTTP. Backends are not contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Checks every registered backend in turn. Any unhealthy backend makes
/// the whole service not ready.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::with_capacity(state.health_checks.len());
    let mut ready = true;

    for check in state.health_checks.iter() {
        let status = check.check().await;
        ready &= status.is_healthy();

        let message = match &status {
            HealthStatus::Healthy => None,
            HealthStatus::Unhealthy(msg) => Some(msg.clone()),
        };

        checks.push(ComponentHealth {
            name: check.name().to_string(),
            status: status.label().to_string(),
            message,
        });
    }

    let (code, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadinessResponse {
            status: label.to_string(),
            checks,
        }),
    )
}

/// Bare 200 for orchestrator liveness checks.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is up")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
