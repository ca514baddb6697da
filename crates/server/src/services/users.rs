//! User account CRUD.
//!
//! Creating a user also creates their empty cart; deleting a user removes it.

use chrono::Utc;
use tracing::instrument;

use pet_store_core::{Email, UserId};

use super::auth::hash_password;
use super::{ServiceError, optional, required};
use crate::db::{RepositoryError, Storage};
use crate::models::{Cart, User, UserInput};

pub struct UserService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> UserService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if storage fails.
    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.storage.list_users().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    pub async fn find(&self, id: &UserId) -> Result<User, ServiceError> {
        self.storage
            .find_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    /// Create a user and their empty cart.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if the username or password is
    /// missing or the email is invalid, and `ServiceError::Conflict` if the
    /// username is taken.
    #[instrument(skip(self, input), fields(username = ?input.username))]
    pub async fn create(&self, input: UserInput) -> Result<User, ServiceError> {
        let password = input
            .password
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("password is required".to_owned()))?;

        let user = User {
            id: UserId::generate(),
            username: required("username", input.username)?,
            password_hash: hash(&password)?,
            first_name: optional(input.first_name),
            last_name: optional(input.last_name),
            email: parse_email(input.email)?,
            phone: optional(input.phone),
            authority: input.authority.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let cart = Cart::empty(user.id.clone());

        self.storage
            .insert_user(&user, &cart)
            .await
            .map_err(|e| taken(e, &user.username))?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Replace a user's attributes. A missing password or authority keeps
    /// the current one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist,
    /// `ServiceError::Validation` for invalid input and
    /// `ServiceError::Conflict` if the new username is taken.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update(&self, id: &UserId, input: UserInput) -> Result<User, ServiceError> {
        let existing = self.find(id).await?;

        let password_hash = match input.password.filter(|p| !p.trim().is_empty()) {
            Some(password) => hash(&password)?,
            None => existing.password_hash,
        };

        let user = User {
            id: id.clone(),
            username: required("username", input.username)?,
            password_hash,
            first_name: optional(input.first_name),
            last_name: optional(input.last_name),
            email: parse_email(input.email)?,
            phone: optional(input.phone),
            authority: input.authority.unwrap_or(existing.authority),
            created_at: existing.created_at,
        };

        self.storage
            .update_user(&user)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ServiceError::not_found("user", id),
                other => taken(other, &user.username),
            })?;
        tracing::info!("User updated");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the user does not exist.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: &UserId) -> Result<(), ServiceError> {
        self.storage.delete_user(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::not_found("user", id),
            other => other.into(),
        })?;
        tracing::info!("User deleted");
        Ok(())
    }
}

fn hash(password: &str) -> Result<String, ServiceError> {
    hash_password(password).map_err(|_| ServiceError::PasswordHash)
}

fn parse_email(raw: Option<String>) -> Result<Option<Email>, ServiceError> {
    Ok(optional(raw).map(|e| Email::parse(&e)).transpose()?)
}

fn taken(e: RepositoryError, username: &str) -> ServiceError {
    match e {
        RepositoryError::Conflict(_) => {
            ServiceError::Conflict(format!("username {username} is already taken"))
        }
        other => other.into(),
    }
}
