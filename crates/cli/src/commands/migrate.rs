//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! pms-cli migrate
//! ```
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time.

use pet_store_server::db::create_pool;

use super::{CliError, database_url};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CliError` if the database URL is missing, the connection fails
/// or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
