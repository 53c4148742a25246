//! # Roster Repository
//!
//! Persistence for user records.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>  (store interface)
//! PgUserRepository              (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryUserRepository;

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{NewUser, UserChanges, UserId};

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(&NewUser::new("Ann", "a@x.com")).await.unwrap();

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Ann");
        assert_eq!(found.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(&NewUser::new("Ann", "a@x.com")).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.create(&NewUser::new("Bob", "b@x.com")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_all_in_creation_order() {
        let repo = InMemoryUserRepository::new();
        for name in ["Ann", "Bob", "Cid"] {
            repo.create(&NewUser::new(name, format!("{name}@x.com"))).await.unwrap();
        }

        let names: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cid"]);
        assert_eq!(repo.find_all_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(&NewUser::new("Ann", "a@x.com")).await.unwrap();

        let changes = UserChanges {
            name: Some("Anna".to_string()),
            email: None,
        };
        let updated = repo.update(user.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Anna");
        assert_eq!(updated.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(UserId::new(5), &UserChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_user() {
        let repo = InMemoryUserRepository::new();
        assert!(!repo.delete(UserId::new(1)).await.unwrap());
    }
}
