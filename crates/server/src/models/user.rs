//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pet_store_core::{Authority, Email, UserId};

/// A user account.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Login name, unique across all users.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub authority: Authority,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("authority", &self.authority)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Unvalidated user attributes.
///
/// On update a `None` password keeps the existing one.
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub authority: Option<Authority>,
}

/// The authenticated caller, resolved from an auth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub authority: Authority,
}

impl CurrentUser {
    /// Whether the caller holds any of `allowed`. Admins always pass.
    #[must_use]
    pub fn has_any(&self, allowed: &[Authority]) -> bool {
        self.authority == Authority::Admin || allowed.contains(&self.authority)
    }

    /// Whether the caller is `user_id` or an admin.
    #[must_use]
    pub fn is_self_or_admin(&self, user_id: &UserId) -> bool {
        self.authority == Authority::Admin || &self.id == user_id
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            authority: user.authority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(authority: Authority) -> CurrentUser {
        CurrentUser {
            id: UserId::new("u1"),
            username: "kate".to_string(),
            authority,
        }
    }

    #[test]
    fn test_admin_passes_every_role_check() {
        assert!(caller(Authority::Admin).has_any(&[Authority::StockManager]));
        assert!(caller(Authority::Admin).has_any(&[]));
    }

    #[test]
    fn test_role_check_for_non_admin() {
        let manager = caller(Authority::StoreManager);
        assert!(manager.has_any(&[Authority::StoreManager]));
        assert!(!manager.has_any(&[Authority::StockManager]));
    }

    #[test]
    fn test_self_or_admin() {
        let user = caller(Authority::User);
        assert!(user.is_self_or_admin(&UserId::new("u1")));
        assert!(!user.is_self_or_admin(&UserId::new("u2")));
        assert!(caller(Authority::Admin).is_self_or_admin(&UserId::new("u2")));
    }
}
