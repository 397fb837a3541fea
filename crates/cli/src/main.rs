//! Mousse & Melts CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the document and session tables
//! mm-cli migrate
//!
//! # Replace the products with the standard menu
//! mm-cli seed products
//!
//! # Hash a password for ADMIN_PASSWORD_HASH (reads it from stdin)
//! mm-cli admin hash-password
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed products` - Reset the product catalog
//! - `admin hash-password` - Produce an Argon2 hash for the admin login

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mm-cli")]
#[command(author, version, about = "Mousse & Melts CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage the admin login
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Delete every product and upload the standard menu
    Products,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash a password read from stdin
    HashPassword,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products => {
                commands::seed::products().await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::HashPassword => commands::admin::hash_password()?,
        },
    }
    Ok(())
}
