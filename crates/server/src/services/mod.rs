//! Business logic services for the pet store.
//!
//! Each service borrows the storage handle for the duration of one request
//! and enforces the rules the repositories do not: existence checks with
//! entity-specific messages, input validation and quantity arithmetic.
//!
//! # Services
//!
//! - `store_stock` - Store↔Stock associations
//! - `stock_product` - product quantities held by a stock
//! - `cart` - cart lines and totals
//! - `stores` / `stocks` / `products` / `users` - entity CRUD
//! - `auth` - password login and auth tokens

pub mod auth;
pub mod cart;
pub mod products;
pub mod stock_product;
pub mod stocks;
pub mod store_stock;
pub mod stores;
pub mod users;

use thiserror::Error;

use pet_store_core::{CostError, EmailError};

use crate::db::RepositoryError;

pub use cart::{CartManager, CartView};
pub use products::ProductService;
pub use stock_product::StockProductManager;
pub use stocks::StockService;
pub use store_stock::StoreStockManager;
pub use stores::StoreService;
pub use users::UserService;

/// Errors returned by the services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An id did not resolve, or an association/line is absent.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The operation would duplicate something that must be unique.
    #[error("{0}")]
    Conflict(String),

    /// Input rejected before touching storage.
    #[error("{0}")]
    Validation(String),

    /// Storage failure.
    #[error(transparent)]
    Repository(RepositoryError),

    /// Argon2 refused to hash a password.
    #[error("password hashing failed")]
    PasswordHash,
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Repository(other),
        }
    }
}

impl From<EmailError> for ServiceError {
    fn from(e: EmailError) -> Self {
        Self::Validation(format!("invalid email: {e}"))
    }
}

impl From<CostError> for ServiceError {
    fn from(e: CostError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Trim a required text field, rejecting absent or blank values.
pub(crate) fn required(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!("{field} is required"))),
    }
}

/// Trim an optional text field; blank becomes `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(required("name", Some("  Central ".into())).unwrap(), "Central");
        assert!(matches!(
            required("name", Some("   ".into())),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(required("name", None), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some(" x ".into())), Some("x".to_owned()));
        assert_eq!(optional(Some(String::new())), None);
    }

    #[test]
    fn test_repository_conflict_becomes_conflict() {
        let err = ServiceError::from(RepositoryError::Conflict("taken".into()));
        assert!(matches!(err, ServiceError::Conflict(msg) if msg == "taken"));

        let err = ServiceError::from(RepositoryError::NotFound);
        assert!(matches!(err, ServiceError::Repository(RepositoryError::NotFound)));
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("store", "S1");
        assert_eq!(err.to_string(), "store S1 not found");
    }
}
