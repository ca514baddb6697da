//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

use pet_store_server::db::{PgStorage, create_pool};
use pet_store_server::services::ServiceError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, user, stock_manager, store_manager")]
    InvalidRole(String),

    /// A service rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Read the database URL from `PMS_DATABASE_URL`, falling back to
/// `DATABASE_URL`.
fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("PMS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("PMS_DATABASE_URL"))
}

/// Connect to the database and wrap the pool in the server's storage.
async fn connect() -> Result<PgStorage, CliError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;
    Ok(PgStorage::new(pool))
}
