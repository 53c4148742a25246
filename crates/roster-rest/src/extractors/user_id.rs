//! Path extractor for user ids.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use roster_core::{RosterError, UserId};

/// Extracts the `:id` path segment as a [`UserId`].
///
/// Anything that is not an integer is rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError(RosterError::validation("Invalid user ID")))?;

        parse_user_id(&raw).map(UserIdPath)
    }
}

/// Parses a user id from a path segment.
pub fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
    UserId::parse(raw).map_err(|_| AppError(RosterError::validation("Invalid user ID")))
}
