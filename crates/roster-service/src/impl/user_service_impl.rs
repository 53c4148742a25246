//! User service implementation.

use crate::cache::UserListCache;
use crate::dto::{CacheStatus, CreateUserRequest, UpdateUserRequest, UserListPayload, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use roster_core::{RosterError, RosterResult, UserChanges, UserId};
use roster_repository::UserRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User service backed by a repository and the list cache.
pub struct UserServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    list_cache: UserListCache,
    list_ttl: Duration,
}

impl UserServiceImpl {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        list_cache: UserListCache,
        list_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            list_cache,
            list_ttl,
        }
    }

    /// Clears the cache after a committed write.
    ///
    /// A failure here fails the request: the write is durable but the list
    /// may still be stale.
    async fn invalidate_after_write(&self, operation: &str, id: UserId) -> RosterResult<()> {
        self.list_cache.invalidate_all().await.map_err(|e| {
            warn!("Cache invalidation failed after {} of user {}: {}", operation, id, e);
            e
        })
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, request: CreateUserRequest) -> RosterResult<UserResponse> {
        let new_user = request.into_new_user()?;
        debug!("Creating user: {}", new_user.name);

        let saved_user = self.user_repository.create(&new_user).await?;
        self.invalidate_after_write("create", saved_user.id).await?;

        info!("User created: {}", saved_user.id);
        Ok(UserResponse::from(saved_user))
    }

    async fn get_user(&self, id: UserId) -> RosterResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        Ok(UserResponse::from(user))
    }

    async fn list_users(&self) -> RosterResult<UserListPayload> {
        if let Some(body) = self.list_cache.get_list().await? {
            debug!("Serving user list from cache");
            return Ok(UserListPayload {
                body,
                cache: CacheStatus::Hit,
            });
        }

        debug!("User list cache miss, querying store");
        let users: Vec<UserResponse> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        let body = serde_json::to_vec(&users)?;
        self.list_cache.set_list(&body, self.list_ttl).await?;

        Ok(UserListPayload {
            body,
            cache: CacheStatus::Miss,
        })
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> RosterResult<UserResponse> {
        debug!("Updating user: {}", id);

        let changes = UserChanges::from(request);
        let updated_user = self
            .user_repository
            .update(id, &changes)
            .await?
            .ok_or_else(|| RosterError::not_found("User", id))?;

        self.invalidate_after_write("update", id).await?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(updated_user))
    }

    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        let deleted = self.user_repository.delete(id).await?;

        if !deleted {
            return Err(RosterError::not_found("User", id));
        }

        self.invalidate_after_write("delete", id).await?;

        info!("User deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("list_ttl", &self.list_ttl)
            .finish_non_exhaustive()
    }
}
