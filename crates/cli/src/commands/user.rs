//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap the first admin; further users can be created over the API
//! pms-cli user create -u admin -p 'changeme' -r admin
//! ```

use pet_store_core::{Authority, UserId};
use pet_store_server::models::UserInput;
use pet_store_server::services::UserService;

use super::{CliError, connect};

/// Create a user and their empty cart.
///
/// # Arguments
///
/// * `username` - Login name, must be unique
/// * `password` - Initial password
/// * `role` - `admin`, `user`, `stock_manager` or `store_manager` (the
///   `ROLE_` wire names are accepted too)
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `CliError` if the role is unknown, the database is unreachable or
/// the username is taken.
pub async fn create_user(
    username: &str,
    password: &str,
    role: &str,
) -> Result<UserId, CliError> {
    let authority: Authority = role
        .parse()
        .map_err(|_| CliError::InvalidRole(role.to_owned()))?;

    let storage = connect().await?;

    tracing::info!("Creating user: {} ({})", username, authority);

    let user = UserService::new(&storage)
        .create(UserInput {
            username: Some(username.to_owned()),
            password: Some(password.to_owned()),
            authority: Some(authority),
            ..UserInput::default()
        })
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        user.authority
    );

    Ok(user.id)
}
