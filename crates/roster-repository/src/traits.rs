//! Repository trait definitions.

use roster_core::{NewUser, RosterResult, User, UserChanges, UserId};
use async_trait::async_trait;

/// User repository trait.
///
/// The persistent store for user records. Lookups report absence with
/// `None`/`false`; mapping that to a not-found error is the caller's job.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user and returns it with its assigned ID.
    async fn create(&self, user: &NewUser) -> RosterResult<User>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>>;

    /// Returns every user in creation order.
    async fn find_all(&self) -> RosterResult<Vec<User>>;

    /// Applies the supplied fields to an existing user.
    ///
    /// Returns `None` if no user has the given ID.
    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>>;

    /// Permanently removes a user. Returns `false` if it did not exist.
    async fn delete(&self, id: UserId) -> RosterResult<bool>;
}
