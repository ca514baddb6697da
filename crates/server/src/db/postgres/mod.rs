//! `PostgreSQL` storage backend.
//!
//! Queries are built at runtime with `sqlx::query_as` and mapped through
//! internal `FromRow` row types; domain types never derive `FromRow`
//! themselves. Cascading deletes are declared in the migration and relied on
//! here.

mod carts;
mod products;
mod stocks;
mod stores;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{RepositoryError, Storage};

/// Storage backed by a `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Translate constraint violations on INSERT/UPDATE into repository errors.
///
/// Unique violations become `Conflict`, foreign key violations `NotFound`
/// (the referenced entity does not exist).
fn map_write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

/// `NotFound` unless the statement touched at least one row.
const fn expect_affected(rows: u64) -> Result<(), RepositoryError> {
    if rows == 0 {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

/// Convert a stored INTEGER count into a domain count.
fn count_from_db(value: i32, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative {column} in database")))
}

/// Convert a domain count into an INTEGER bind value.
fn count_to_db(value: u32, column: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|_| {
        RepositoryError::Conflict(format!("{column} {value} exceeds the storable maximum"))
    })
}
