//! Integration tests for Pet Store Management.
//!
//! The tests drive the full router in-process (middleware, extractors and
//! JSON bodies included) against the in-memory storage backend, so they need
//! no database or running server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pet-store-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `store_stock` - Store↔Stock association endpoints
//! - `auth` - Login, logout and role checks
//! - `catalog` - Store, stock, product and user CRUD
//! - `carts` - Cart lines and totals

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use tower::ServiceExt;

use pet_store_core::{Authority, UserId};
use pet_store_server::config::{DEFAULT_AUTH_HEADER, ServerConfig};
use pet_store_server::db::{MemoryStorage, Storage};
use pet_store_server::models::UserInput;
use pet_store_server::services::UserService;
use pet_store_server::services::auth::AuthService;
use pet_store_server::state::AppState;

/// Password given to every user created through [`TestContext`].
pub const PASSWORD: &str = "correct horse battery staple";

/// A fresh application over empty in-memory storage, with a logged-in admin.
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub admin_token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let state = AppState::new(ServerConfig::default(), storage);
        let app = pet_store_server::app(state.clone());

        let mut ctx = Self {
            app,
            state,
            admin_token: String::new(),
        };
        let (_, token) = ctx.user_with_role("admin", Authority::Admin).await;
        ctx.admin_token = token;
        ctx
    }

    /// Create a user directly through the service layer and log them in.
    pub async fn user_with_role(&self, username: &str, authority: Authority) -> (UserId, String) {
        let user = UserService::new(self.state.storage())
            .create(UserInput {
                username: Some(username.to_owned()),
                password: Some(PASSWORD.to_owned()),
                authority: Some(authority),
                ..UserInput::default()
            })
            .await
            .unwrap();

        let (token, _) = AuthService::new(self.state.storage(), self.state.tokens())
            .login(username, PASSWORD)
            .await
            .unwrap();

        (user.id, token)
    }

    /// Send a request and return the status and the JSON body.
    ///
    /// An empty body comes back as `Value::Null`, and a non-JSON body (axum's
    /// own extractor rejections) as a `Value::String`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(DEFAULT_AUTH_HEADER, token);
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    /// [`Self::send`] as the admin.
    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    /// Create a store as the admin and return its id.
    pub async fn create_store(&self, name: &str) -> String {
        let (status, body) = self
            .admin(Method::POST, "/store", Some(serde_json::json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    /// Create a stock as the admin and return its id.
    pub async fn create_stock(&self, specialize: &str) -> String {
        let (status, body) = self
            .admin(
                Method::POST,
                "/stock",
                Some(serde_json::json!({ "specialize": specialize })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    /// Create a product as the admin and return its id.
    pub async fn create_product(&self, name: &str, cost: &str) -> String {
        let (status, body) = self
            .admin(
                Method::POST,
                "/product",
                Some(serde_json::json!({ "name": name, "cost": cost })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }
}

/// The `id` field of a JSON object.
pub fn id_of(body: &Value) -> String {
    body["id"].as_str().unwrap().to_owned()
}

/// The `id` fields of a JSON array, in order.
pub fn ids_of(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(id_of)
        .collect()
}
