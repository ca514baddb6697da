//! Authentication route handlers.
//!
//! Login exchanges a username and password for an opaque token, which the
//! client then sends in the configured auth header.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::extract::Json;
use crate::middleware::AuthToken;
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the token and who it belongs to.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
}

/// POST /auth/login
#[instrument(skip_all, fields(username = %body.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    tracing::info!("Start login");
    let (token, user) = AuthService::new(state.storage(), state.tokens())
        .login(&body.username, &body.password)
        .await?;
    Ok(Json(LoginResponse { token, user }))
}

/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, AuthToken(token): AuthToken) -> StatusCode {
    tracing::info!("Start logout");
    AuthService::new(state.storage(), state.tokens())
        .logout(&token)
        .await;
    StatusCode::NO_CONTENT
}
