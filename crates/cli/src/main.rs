//! Brisa CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! brisa migrate
//!
//! # Seed the database with demo customers
//! brisa seed
//!
//! # Hash an operator password for BRISA_ADMIN_PASSWORD_HASH
//! brisa hash-password
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo customers
//! - `hash-password` - Produce a bcrypt hash for the operator password

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "brisa")]
#[command(author, version, about = "Brisa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo customers
    Seed {
        /// Delete existing customers first
        #[arg(long)]
        clear: bool,
    },
    /// Hash an operator password for `BRISA_ADMIN_PASSWORD_HASH`
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
        Commands::Seed { clear } => commands::seed::run(clear).await?,
        Commands::HashPassword => commands::hash_password::run()?,
    }
    Ok(())
}
