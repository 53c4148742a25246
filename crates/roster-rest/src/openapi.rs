//! OpenAPI document served at `/api-docs/openapi.json`.

use crate::controllers::health_controller::{
    self, ComponentHealth, HealthResponse, ReadinessResponse,
};
use crate::controllers::user_controller;
use roster_core::{ErrorResponse, FieldError};
use roster_service::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        version = "1.0.0",
        description = "User records over PostgreSQL with a cached list endpoint",
        license(name = "MIT")
    ),
    paths(
        user_controller::list_users,
        user_controller::create_user,
        user_controller::get_user,
        user_controller::update_user,
        user_controller::delete_user,
        health_controller::health_check,
        health_controller::readiness_check,
        health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            MessageResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            HealthResponse,
            ComponentHealth,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "users", description = "Create, read, update and delete users"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
