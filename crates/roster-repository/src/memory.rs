//! In-memory user repository.
//!
//! Mirrors the PostgreSQL semantics (sequence ids that are never reused,
//! creation-ordered listing, hard delete) without a database. Counts
//! `find_all` calls so tests can tell whether a list was served from cache.

use crate::traits::UserRepository;
use async_trait::async_trait;
use roster_core::{NewUser, RosterResult, User, UserChanges, UserId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

/// In-memory repository for tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<Inner>,
    find_all_calls: AtomicUsize,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `find_all` has been called.
    #[must_use]
    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> RosterResult<User> {
        let mut inner = self.lock();
        inner.last_id += 1;
        let id = UserId::new(inner.last_id);
        let created = User::new(id, user.name.clone(), user.email.clone());
        inner.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> RosterResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_all(&self) -> RosterResult<Vec<User>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> RosterResult<Option<User>> {
        let mut inner = self.lock();
        Ok(inner.users.get_mut(&id).map(|user| {
            user.apply(changes.clone());
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> RosterResult<bool> {
        Ok(self.lock().users.remove(&id).is_some())
    }
}

impl std::fmt::Debug for InMemoryUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryUserRepository").finish_non_exhaustive()
    }
}
