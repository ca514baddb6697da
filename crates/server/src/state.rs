//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Storage;
use crate::services::auth::TokenStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the storage backend, issued auth tokens and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    storage: Arc<dyn Storage>,
    tokens: TokenStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `storage` - Storage backend (`PostgreSQL` or in-memory)
    #[must_use]
    pub fn new(config: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        let tokens = TokenStore::new(config.token_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                tokens,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the issued auth tokens.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }
}
