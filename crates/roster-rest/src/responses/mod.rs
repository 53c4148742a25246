//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{ErrorResponse, RosterError};
use roster_service::MessageResponse;
use tracing::{error, warn};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub RosterError);

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_backend_failure() {
            warn!(code = self.0.error_code(), "Backend unavailable: {}", self.0);
        } else if status.is_server_error() {
            error!(code = self.0.error_code(), "Request failed: {}", self.0);
        }

        let body = Json(ErrorResponse::from_error(&self.0));
        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Helper to create a 200 response carrying a status message.
pub fn message(body: MessageResponse) -> ApiResult<MessageResponse> {
    Ok(Json(body))
}

/// Helper to create a created (201) response.
pub fn created<T>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
