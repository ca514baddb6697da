//! Persistence for the pet store.
//!
//! # Backends
//!
//! Every entity is reached through a repository trait. [`Storage`] bundles
//! them so the rest of the server holds a single `Arc<dyn Storage>`:
//!
//! - [`postgres::PgStorage`] - `PostgreSQL` via sqlx (production)
//! - [`memory::MemoryStorage`] - process-local tables (demos and tests)
//!
//! # Tables (`PostgreSQL`, schema `pms`)
//!
//! - `store` / `stock` / `product` / `app_user` - entities
//! - `store_stock` - Store↔Stock associations, PK `(store_id, stock_id)`
//! - `product_stock` - units of a product held by a stock
//! - `cart` / `cart_product_stock` - one cart per user and its lines
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p pet-store-cli -- migrate
//! ```
//!
//! # Deletion rules
//!
//! Both backends implement the same rules explicitly:
//! - deleting a store removes its association rows, never the stocks
//! - deleting a stock removes its association rows and product stocks
//! - deleting a product stock (directly or via its stock/product) removes the
//!   cart lines that reference it
//! - deleting a user removes their cart

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use pet_store_core::{CartId, ProductId, ProductStockId, StockId, StoreId, UserId};

use crate::config::ServerConfig;
use crate::models::{Cart, CartLine, Product, ProductStock, Stock, Store, User};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate association, unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Stores and their stock associations.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn list_stores(&self) -> Result<Vec<Store>, RepositoryError>;

    /// Load a store together with its ordered stock ids.
    async fn find_store(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError>;

    /// Insert a new store. Its `stocks` set is ignored; stores start empty.
    async fn insert_store(&self, store: &Store) -> Result<(), RepositoryError>;

    /// Overwrite a store's own attributes. Associations are left untouched.
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the store does not exist.
    async fn delete_store(&self, id: &StoreId) -> Result<(), RepositoryError>;

    /// Record a Store↔Stock association at the end of the store's list.
    ///
    /// Returns `RepositoryError::Conflict` if the pair already exists and
    /// `RepositoryError::NotFound` if either side does not exist.
    async fn attach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<(), RepositoryError>;

    /// Remove a Store↔Stock association. Returns whether a pair was removed.
    async fn detach_stock(
        &self,
        store_id: &StoreId,
        stock_id: &StockId,
    ) -> Result<bool, RepositoryError>;
}

/// Stocks and the product quantities they hold.
#[async_trait]
pub trait StockRepository: Send + Sync {
    async fn list_stocks(&self) -> Result<Vec<Stock>, RepositoryError>;

    async fn find_stock(&self, id: &StockId) -> Result<Option<Stock>, RepositoryError>;

    /// Load several stocks, preserving the order of `ids` and skipping unknown ones.
    async fn find_stocks(&self, ids: &[StockId]) -> Result<Vec<Stock>, RepositoryError>;

    async fn insert_stock(&self, stock: &Stock) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the stock does not exist.
    async fn update_stock(&self, stock: &Stock) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the stock does not exist.
    async fn delete_stock(&self, id: &StockId) -> Result<(), RepositoryError>;

    async fn list_product_stocks(
        &self,
        stock_id: &StockId,
    ) -> Result<Vec<ProductStock>, RepositoryError>;

    async fn find_product_stock(
        &self,
        id: &ProductStockId,
    ) -> Result<Option<ProductStock>, RepositoryError>;

    /// The row for `product_id` in `stock_id`, if the stock holds that product.
    async fn find_product_stock_for(
        &self,
        stock_id: &StockId,
        product_id: &ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError>;

    /// Insert or overwrite a product stock row (matched by id).
    async fn save_product_stock(&self, row: &ProductStock) -> Result<(), RepositoryError>;

    /// Returns whether a row was removed.
    async fn delete_product_stock(&self, id: &ProductStockId) -> Result<bool, RepositoryError>;
}

/// Product catalogue.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn update_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn delete_product(&self, id: &ProductId) -> Result<(), RepositoryError>;
}

/// User accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<User>, RepositoryError>;

    /// Insert a user together with their (empty) cart, atomically.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn insert_user(&self, user: &User, cart: &Cart) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the user does not exist and
    /// `RepositoryError::Conflict` if the new username is taken.
    async fn update_user(&self, user: &User) -> Result<(), RepositoryError>;

    /// Returns `RepositoryError::NotFound` if the user does not exist.
    async fn delete_user(&self, id: &UserId) -> Result<(), RepositoryError>;
}

/// Shopping carts and their lines.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_cart(&self, id: &CartId) -> Result<Option<Cart>, RepositoryError>;

    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Insert or overwrite the line for `line.product_stock_id`.
    async fn save_cart_line(&self, cart_id: &CartId, line: &CartLine)
    -> Result<(), RepositoryError>;

    /// Returns whether a line was removed.
    async fn delete_cart_line(
        &self,
        cart_id: &CartId,
        product_stock_id: &ProductStockId,
    ) -> Result<bool, RepositoryError>;

    /// Remove every line from the cart.
    async fn clear_cart(&self, cart_id: &CartId) -> Result<(), RepositoryError>;
}

/// All repositories behind one handle.
#[async_trait]
pub trait Storage:
    StoreRepository + StockRepository + ProductRepository + UserRepository + CartRepository
{
    /// Short name of the backend, for logs.
    fn backend(&self) -> &'static str;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Open the storage backend selected by the configuration.
///
/// Uses `PostgreSQL` when a database URL is configured, otherwise in-memory
/// tables.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database connection cannot be established.
pub async fn open_storage(config: &ServerConfig) -> Result<Arc<dyn Storage>, sqlx::Error> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            Ok(Arc::new(PgStorage::new(pool)))
        }
        None => {
            tracing::warn!("No database URL configured; data will be kept in memory only");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
