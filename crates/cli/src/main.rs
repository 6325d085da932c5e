//! Coverbook CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run registry database migrations
//! coverbook-cli migrate
//!
//! # Seed demo insureds (through the real service, so all rules apply)
//! coverbook-cli seed --count 25
//!
//! # Seed against an in-memory store (no database required)
//! coverbook-cli seed --count 25 --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the registry with demo insureds

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "coverbook-cli")]
#[command(author, version, about = "Coverbook CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run registry database migrations
    Migrate,
    /// Seed the registry with demo insureds
    Seed {
        /// How many demo insureds to create
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Use an in-memory store instead of PostgreSQL
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coverbook_cli=info,coverbook_server=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { count, dry_run } => commands::seed::run(count, dry_run).await,
    };

    if let Err(error) = result {
        tracing::error!(%error, "Command failed");
        std::process::exit(1);
    }
}
