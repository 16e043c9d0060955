//! Inventory CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! inv-cli migrate
//!
//! # Load the demo inventory (skipped if stores already exist)
//! inv-cli seed
//!
//! # Wipe all inventory and load a custom file
//! inv-cli seed --file path/to/inventory.yaml --reset
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed stores, products and stock from YAML

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "inv-cli")]
#[command(author, version, about = "Inventory service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with stores and their stock
    Seed {
        /// Path to the YAML seed file
        #[arg(short, long, default_value = "crates/cli/seeds/inventory.yaml")]
        file: PathBuf,

        /// Delete all stores, products and stock before seeding
        #[arg(long)]
        reset: bool,
    },
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
        Commands::Seed { file, reset } => commands::seed::run(&file, reset).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_defaults() {
        let cli = Cli::try_parse_from(["inv-cli", "seed"]).unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Seed { file, reset } => {
                assert_eq!(file, PathBuf::from("crates/cli/seeds/inventory.yaml"));
                assert!(!reset);
            }
            Commands::Migrate => panic!("expected seed"),
        }
    }
}
