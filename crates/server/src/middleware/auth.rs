//! Authentication extractors.
//!
//! Callers authenticate by sending the token issued at login in the
//! configured auth header (`x-auth-token` by default). A missing or unknown
//! token is rejected with 401; a valid token without the required role with
//! 403.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::Span;

use pet_store_core::Authority;

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// The raw auth token sent with the request.
///
/// Rejects with 401 when the header is absent or blank.
pub struct AuthToken(pub String);

impl FromRequestParts<AppState> for AuthToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(&state.config().auth_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self(token.to_owned()))
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor that requires an authenticated caller, whatever their role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthToken(token) = AuthToken::from_request_parts(parts, state).await?;

        let user = AuthService::new(state.storage(), state.tokens())
            .authenticate(&token)
            .await?;

        Span::current().record("user_id", user.id.as_str());
        set_sentry_user(&user.id, &user.username);

        Ok(Self(user))
    }
}

/// Define an extractor that requires one of the given roles.
///
/// Admins always pass.
macro_rules! define_role_guard {
    ($(#[$meta:meta])* $name:ident, [$($role:expr),* $(,)?]) => {
        $(#[$meta])*
        pub struct $name(pub CurrentUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

                if !user.has_any(&[$($role),*]) {
                    tracing::warn!(
                        user_id = %user.id,
                        authority = %user.authority,
                        "Role check failed"
                    );
                    return Err(AppError::Forbidden("Insufficient role".to_string()));
                }

                Ok(Self(user))
            }
        }
    };
}

define_role_guard!(
    /// Requires `ROLE_ADMIN`.
    RequireAdmin,
    []
);

define_role_guard!(
    /// Requires `ROLE_ADMIN` or `ROLE_STORE_MANAGER`.
    RequireStoreManager,
    [Authority::StoreManager]
);

define_role_guard!(
    /// Requires `ROLE_ADMIN` or `ROLE_STOCK_MANAGER`.
    RequireStockManager,
    [Authority::StockManager]
);
