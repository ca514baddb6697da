//! Issued auth tokens.
//!
//! Tokens are 32 random bytes, base64url encoded, mapped to the user they
//! were issued to. They live only in process memory and expire after a
//! period without use.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use moka::future::Cache;
use rand::RngCore;

use pet_store_core::UserId;

use crate::models::CurrentUser;

/// Upper bound on concurrently valid tokens.
const MAX_TOKENS: u64 = 100_000;

/// Token → user map with idle expiry.
#[derive(Clone)]
pub struct TokenStore {
    cache: Cache<String, CurrentUser>,
}

impl TokenStore {
    /// Create a store whose tokens expire after `idle` without use.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_TOKENS)
            .time_to_idle(idle)
            .support_invalidation_closures()
            .build();

        Self { cache }
    }

    /// Issue a fresh token for `user`.
    pub async fn issue(&self, user: CurrentUser) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        self.cache.insert(token.clone(), user).await;
        token
    }

    /// The user a live token belongs to.
    pub async fn resolve(&self, token: &str) -> Option<CurrentUser> {
        self.cache.get(token).await
    }

    pub async fn revoke(&self, token: &str) {
        self.cache.invalidate(token).await;
    }

    /// Revoke every token issued to `user_id`, e.g. after the account is
    /// deleted or its role changes.
    pub fn revoke_user(&self, user_id: &UserId) {
        let user_id = user_id.clone();
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |_, user| user.id == user_id)
        {
            tracing::warn!(error = %e, "Failed to revoke tokens");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("live", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pet_store_core::Authority;

    use super::*;

    fn user(id: &str) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            username: id.to_string(),
            authority: Authority::User,
        }
    }

    #[tokio::test]
    async fn test_issue_resolve_revoke() {
        let store = TokenStore::new(Duration::from_secs(60));
        let token = store.issue(user("u1")).await;

        assert_eq!(token.len(), 43);
        assert_eq!(store.resolve(&token).await.unwrap().id, UserId::new("u1"));

        store.revoke(&token).await;
        assert!(store.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let store = TokenStore::new(Duration::from_secs(60));
        let a = store.issue(user("u1")).await;
        let b = store.issue(user("u1")).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = TokenStore::new(Duration::from_secs(60));
        assert!(store.resolve("nope").await.is_none());
    }
}
