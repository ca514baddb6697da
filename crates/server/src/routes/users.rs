//! User account route handlers.
//!
//! Administration only, except that any caller may read their own record.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pet_store_core::{Authority, UserId};

use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{User, UserInput};
use crate::services::UserService;
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// User as returned to clients. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub authority: Authority,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_ref().map(ToString::to_string),
            phone: user.phone.clone(),
            authority: user.authority,
            created_at: user.created_at,
        }
    }
}

/// Create/update request body. `id` is required on update only.
#[derive(Default, Deserialize)]
pub struct UserRequest {
    pub id: Option<UserId>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub authority: Option<Authority>,
}

impl UserRequest {
    fn into_parts(self) -> (Option<UserId>, UserInput) {
        let input = UserInput {
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            authority: self.authority,
        };
        (self.id, input)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /user
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<UserDto>>> {
    tracing::info!("Start getAllUsers");
    let users = UserService::new(state.storage()).list().await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

/// GET /user/{id}
#[instrument(skip_all, fields(target_user_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<UserDto>> {
    tracing::info!("Start findUserById");
    if !caller.is_self_or_admin(&id) {
        return Err(AppError::Forbidden(
            "Cannot read another user's record".to_string(),
        ));
    }
    let user = UserService::new(state.storage()).find(&id).await?;
    Ok(Json(UserDto::from(&user)))
}

/// POST /user
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(body): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserDto>)> {
    tracing::info!("Start createUser");
    let (_, input) = body.into_parts();
    let user = UserService::new(state.storage()).create(input).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(&user))))
}

/// PUT /user
///
/// Outstanding tokens of the user are revoked so a role change takes effect
/// on their next login.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(body): Json<UserRequest>,
) -> Result<Json<UserDto>> {
    tracing::info!("Start updateUser");
    let (id, input) = body.into_parts();
    let id = id.ok_or_else(|| AppError::BadRequest("id is required".to_string()))?;
    let user = UserService::new(state.storage()).update(&id, input).await?;
    state.tokens().revoke_user(&user.id);
    Ok(Json(UserDto::from(&user)))
}

/// DELETE /user/{id}
#[instrument(skip_all, fields(target_user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    tracing::info!("Start deleteUser");
    UserService::new(state.storage()).delete(&id).await?;
    state.tokens().revoke_user(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_request_parses_role_and_camel_case() {
        let body: UserRequest = serde_json::from_str(
            r#"{"username":"kate","password":"pw","firstName":"Kate","authority":"ROLE_STOCK_MANAGER"}"#,
        )
        .unwrap();
        let (_, input) = body.into_parts();
        assert_eq!(input.first_name.as_deref(), Some("Kate"));
        assert_eq!(input.authority, Some(Authority::StockManager));
    }
}
