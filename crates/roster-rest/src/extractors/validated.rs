//! JSON body extractor that also runs `validator` rules.
//!
//! A body that does not parse is a 400 `INVALID_JSON`. A body that parses
//! but is missing a required field is a 422 `VALIDATION_ERROR` listing each
//! offending field.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{field_errors, ErrorResponse};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Drop-in replacement for `Json<T>` on handlers whose payload derives
/// `Validate`.
///
/// ```ignore
/// async fn create_user(ValidatedJson(request): ValidatedJson<CreateUserRequest>) {
///     // name and email are both present here
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// Not JSON, wrong content type, or the wrong shape.
    Malformed(JsonRejection),
    /// Parsed, but `validate()` failed.
    Invalid(ValidationErrors),
}

impl ValidatedJsonRejection {
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                },
            ),
            Self::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Missing or invalid fields".to_string(),
                    details: None,
                }
                .with_details(field_errors(errors)),
            ),
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        debug!(code = %body.code, "Rejected request body: {}", body.message);
        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => payload,
            Err(rejection) => return Err(ValidatedJsonRejection::Malformed(rejection)),
        };

        payload.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(payload))
    }
}
