//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserListPayload, UserResponse};
use async_trait::async_trait;
use roster_core::{RosterResult, UserId};

/// User service trait.
///
/// Writes clear the whole cache after the store call succeeds; `list_users`
/// reads through the cache; `get_user` never touches it.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse>;

    /// Returns the serialized list of all users, cached or fresh.
    async fn list_users(&self) -> RosterResult<UserListPayload>;

    /// Applies the supplied fields to a user.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;
}
