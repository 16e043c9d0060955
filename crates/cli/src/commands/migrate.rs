//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! inv-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations live in `crates/api/migrations/` and are embedded at build time.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Read `DATABASE_URL`, loading `.env` first.
pub(crate) fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("DATABASE_URL").ok().map(SecretString::from)
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `MigrationError` if `DATABASE_URL` is unset, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url().ok_or(MigrationError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
