//! Authentication service.
//!
//! Password login against Argon2id hashes, with opaque bearer tokens sent
//! back in the configured auth header.

mod error;
mod tokens;

pub use error::AuthError;
pub use tokens::TokenStore;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use crate::db::Storage;
use crate::models::CurrentUser;

/// Authentication service.
pub struct AuthService<'a> {
    storage: &'a dyn Storage,
    tokens: &'a TokenStore,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage, tokens: &'a TokenStore) -> Self {
        Self { storage, tokens }
    }

    /// Verify a username and password and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the user does not exist or
    /// the password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, CurrentUser), AuthError> {
        let user = self
            .storage
            .find_user_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let current = CurrentUser::from(&user);
        let token = self.tokens.issue(current.clone()).await;
        tracing::info!(user_id = %current.id, "User logged in");
        Ok((token, current))
    }

    /// Invalidate a token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        self.tokens.revoke(token).await;
    }

    /// Resolve a token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        self.tokens
            .resolve(token)
            .await
            .ok_or(AuthError::InvalidToken)
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use pet_store_core::{Authority, UserId};

    use super::*;
    use crate::db::{MemoryStorage, UserRepository};
    use crate::models::{Cart, User};

    async fn storage_with_user(password: &str) -> MemoryStorage {
        let storage = MemoryStorage::new();
        let user = User {
            id: UserId::new("U1"),
            username: "admin".to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            authority: Authority::Admin,
            created_at: Utc::now(),
        };
        let cart = Cart::empty(user.id.clone());
        storage.insert_user(&user, &cart).await.unwrap();
        storage
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let storage = storage_with_user("s3cret").await;
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&storage, &tokens);

        let (token, user) = auth.login("admin", "s3cret").await.unwrap();
        assert_eq!(user.authority, Authority::Admin);
        assert_eq!(auth.authenticate(&token).await.unwrap(), user);

        auth.logout(&token).await;
        assert!(matches!(
            auth.authenticate(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let storage = storage_with_user("s3cret").await;
        let tokens = TokenStore::new(Duration::from_secs(60));
        let auth = AuthService::new(&storage, &tokens);

        assert!(matches!(
            auth.login("admin", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "s3cret").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
