//! User management controller.

use crate::{
    extractors::{UserIdPath, ValidatedJson},
    responses::{created, message, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_core::ErrorResponse;
use roster_service::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};
use tracing::debug;

/// Response header reporting whether the list came from the cache.
pub const X_CACHE: &str = "x-cache";

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users.
///
/// The body is written exactly as cached, so repeated reads within the TTL
/// are byte-identical.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [UserResponse],
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 503, description = "Store or cache unavailable", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Response, AppError> {
    debug!("List users request");

    let payload = state.user_service.list_users().await?;
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
        (HeaderName::from_static(X_CACHE), HeaderValue::from_static(payload.cache.as_header_value())),
    ];

    Ok((headers, payload.body).into_response())
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Missing field", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    debug!("Create user request");

    state.user_service.create_user(request).await?;
    Ok(created(MessageResponse::user_created()))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let response = state.user_service.get_user(id).await?;
    ok(response)
}

/// Update a user. Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Update user request: {}", id);

    state.user_service.update_user(id, request).await?;
    message(MessageResponse::updated())
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    UserIdPath(id): UserIdPath,
) -> ApiResult<MessageResponse> {
    debug!("Delete user request: {}", id);

    state.user_service.delete_user(id).await?;
    message(MessageResponse::deleted())
}
