//! User-related DTOs.

use roster_core::{NewUser, RosterError, User, UserChanges, UserId, ValidateExt};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new user.
///
/// Fields are optional at the serde level so a missing field surfaces as a
/// validation error with a field name instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(required(message = "name is required"))]
    #[schema(example = "Ann")]
    pub name: Option<String>,

    #[validate(required(message = "email is required"))]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
}

impl CreateUserRequest {
    /// Creates a request with both fields present.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Validates presence of both fields and converts into a store input.
    pub fn into_new_user(self) -> Result<NewUser, RosterError> {
        self.validate_request()?;
        match (self.name, self.email) {
            (Some(name), Some(email)) => Ok(NewUser::new(name, email)),
            _ => Err(RosterError::validation("name and email are required")),
        }
    }
}

/// Request to update a user. Absent or `null` fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
        }
    }
}

/// User response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = i64, example = 1)]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}


/// Body carrying a single status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Creates a message body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn user_created() -> Self {
        Self::new("User created")
    }

    #[must_use]
    pub fn updated() -> Self {
        Self::new("Updated")
    }

    #[must_use]
    pub fn deleted() -> Self {
        Self::new("Deleted")
    }
}

/// Whether a list response came from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value for the `X-Cache` response header.
    #[must_use]
    pub const fn as_header_value(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// Serialized user list as returned to clients.
///
/// `body` is a JSON array of [`UserResponse`]. On a hit it is the cached
/// bytes exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListPayload {
    pub body: Vec<u8>,
    pub cache: CacheStatus,
}

#[cfg(test)]
impl UserListPayload {
    pub(crate) fn users(&self) -> Result<Vec<UserResponse>, RosterError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
