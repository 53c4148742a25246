//! User entity.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, immutable after creation.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Contact email. Not checked for format.
    pub email: String,
}

impl User {
    /// Creates a user value from its stored parts.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Applies a partial update. Fields left as `None` keep their value.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

/// Field values for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Partial update of a user's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> User {
        User::new(UserId::new(1), "Ann", "a@x.com")
    }

    #[test]
    fn test_apply_name_only_keeps_email() {
        let mut user = ann();
        user.apply(UserChanges {
            name: Some("Anna".to_string()),
            email: None,
        });
        assert_eq!(user.name, "Anna");
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn test_apply_email_only_keeps_name() {
        let mut user = ann();
        user.apply(UserChanges {
            name: None,
            email: Some("ann@y.org".to_string()),
        });
        assert_eq!(user.name, "Ann");
        assert_eq!(user.email, "ann@y.org");
    }

    #[test]
    fn test_apply_empty_changes_is_noop() {
        let mut user = ann();
        let changes = UserChanges::default();
        assert!(changes.is_empty());
        user.apply(changes);
        assert_eq!(user, ann());
    }

    #[test]
    fn test_user_serializes_flat() {
        let json = serde_json::to_value(ann()).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Ann", "email": "a@x.com"}));
    }
}
