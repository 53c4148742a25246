//! The error type shared by the store, cache, service and HTTP layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong while serving a request.
///
/// `NotFound` and `Validation` describe the caller's request. `Database`
/// and `Cache` mean a backend could not be reached or rejected a command;
/// both are retryable from the client's point of view.
#[derive(Error, Debug)]
pub enum RosterError {
    /// No record with the given id.
    #[error("{resource_type} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// The request was understood but is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// PostgreSQL failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Redis failure, including pool exhaustion.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Invalid or incomplete settings detected at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// HTTP status for this error.
    ///
    /// Backend failures answer 503 so clients know to retry.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Database(_) | Self::Cache(_) => 503,
            Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Stable code placed in [`ErrorResponse::code`].
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for store and cache failures.
    #[must_use]
    pub const fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Cache(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().is_some_and(|code| is_data_exception(&code)) {
                return Self::Validation(db_err.message().to_string());
            }
        }
        Self::Database(err.to_string())
    }
}

/// SQLSTATE class 22: the statement reached the store but a value was
/// rejected, e.g. a string longer than its `VARCHAR` column. Retrying the
/// same request cannot succeed.
#[cfg(feature = "sqlx")]
fn is_data_exception(sqlstate: &str) -> bool {
    sqlstate.starts_with("22")
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("failed to encode JSON: {}", err))
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// Per-field problems, present only for rejected request bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One rejected field, e.g. `{"field":"email","code":"required",...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Validator rule that failed.
    pub code: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn from_error(error: &RosterError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Attaches per-field problems.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&RosterError> for ErrorResponse {
    fn from(error: &RosterError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(RosterError::not_found("User", 1).status_code(), 404);
        assert_eq!(RosterError::validation("missing name").status_code(), 400);
        assert_eq!(RosterError::Database("down".to_string()).status_code(), 503);
        assert_eq!(RosterError::cache("down").status_code(), 503);
        assert_eq!(RosterError::internal("oops").status_code(), 500);
        assert_eq!(RosterError::Configuration("bad".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RosterError::not_found("User", 1).error_code(), "NOT_FOUND");
        assert_eq!(RosterError::validation("bad input").error_code(), "VALIDATION_ERROR");
        assert_eq!(RosterError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(RosterError::cache("redis").error_code(), "CACHE_ERROR");
        assert_eq!(RosterError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_found_message() {
        let err = RosterError::not_found("User", 42);
        assert_eq!(err.to_string(), "User not found");
        match err {
            RosterError::NotFound { id, .. } => assert_eq!(id, "42"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_data_exceptions_are_not_backend_failures() {
        // 22001 string_data_right_truncation, 22P02 invalid_text_representation
        assert!(is_data_exception("22001"));
        assert!(is_data_exception("22P02"));
        // 08006 connection_failure, 57P01 admin_shutdown, 23505 unique_violation
        assert!(!is_data_exception("08006"));
        assert!(!is_data_exception("57P01"));
        assert!(!is_data_exception("23505"));
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_failures_stay_database_errors() {
        let err = RosterError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RosterError::Database(_)));
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn test_backend_failures() {
        assert!(RosterError::Database("connection lost".to_string()).is_backend_failure());
        assert!(RosterError::cache("timeout").is_backend_failure());
        assert!(!RosterError::not_found("User", 1).is_backend_failure());
        assert!(!RosterError::validation("bad").is_backend_failure());
    }

    #[test]
    fn test_error_response_from_error() {
        let err = RosterError::not_found("User", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "User not found");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = RosterError::validation("bad input");
        let details = vec![FieldError {
            field: "email".to_string(),
            message: "email is required".to_string(),
            code: "required".to_string(),
        }];
        let response = ErrorResponse::from_error(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }

    #[test]
    fn test_error_response_skips_empty_details() {
        let response = ErrorResponse::from(&RosterError::not_found("User", 7));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "User not found");
        assert!(json.get("details").is_none());
    }
}
