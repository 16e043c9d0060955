//! Database operations for the inventory `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `stores` - Stores holding inventory
//! - `products` - Catalog items, unique per (name, category)
//! - `store_products` - Stock of one product in one store (price in cents, quantity)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p inventory-cli -- migrate
//! ```

pub mod products;
pub mod store_products;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use inventory_core::SortDirection;

pub use products::ProductRepository;
pub use store_products::{StoreProductRepository, insert_stock};
pub use stores::{StoreRepository, insert_store};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Foreign key violation (the referenced row does not exist).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),
}

impl RepositoryError {
    /// Classify a write error by the constraint it violated.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default().to_owned();
            if db_err.is_unique_violation() {
                return Self::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKey(constraint);
            }
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Build an `ILIKE` pattern matching `needle` anywhere, case-insensitively.
///
/// `%`, `_` and `\` in the input are escaped so they match literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// SQL keyword for a sort direction.
pub(crate) const fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

/// Pool on the database named by `DATABASE_URL`, migrated to the latest schema.
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&secrecy::SecretString::from(url), 5)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}
