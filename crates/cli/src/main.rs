//! Pet Store Management CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pms-cli migrate
//!
//! # Create the first admin
//! pms-cli user create -u admin -p 'changeme' -r admin
//!
//! # Insert a demo store, stock and product
//! pms-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user (and their cart)
//! - `seed` - Insert demo data
//!
//! All commands read `PMS_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pms-cli")]
#[command(author, version, about = "Pet Store Management CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Insert a demo store, stock and product
    Seed,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Initial password
        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `user`, `stock_manager`, `store_manager`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                role,
            } => {
                commands::user::create_user(&username, &password, &role).await?;
            }
        },
        Commands::Seed => commands::seed::demo().await?,
    }
    Ok(())
}
