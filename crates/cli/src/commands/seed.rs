//! Seed the database with stores and their stock from a YAML file.
//!
//! Products are upserted by (name, category), so a product listed under
//! several stores is created once and shared. Seeding is skipped when the
//! database already holds stores, unless `--reset` empties it first. The
//! whole run, reset included, is one transaction.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use inventory_api::db::{self, RepositoryError};
use inventory_api::models::{NewStoreProduct, StoreInput};
use inventory_core::ProductCategory;

use super::migrate::database_url;

const STORE_TEXT_MAX: usize = 64;
const PRODUCT_NAME_MAX: usize = 128;
const SEED_MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level layout of a seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    pub stores: Vec<SeedStore>,
}

/// A store and the stock it starts with.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedStore {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub products: Vec<SeedStock>,
}

/// One stocked product; `price` is in cents.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedStock {
    pub name: String,
    pub category: ProductCategory,
    pub price: i32,
    pub quantity: i32,
}

/// Check a seed file against the same rules the API enforces.
///
/// Returns one message per problem; empty means valid.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    for store in &seed.stores {
        if !(1..=STORE_TEXT_MAX).contains(&store.name.chars().count()) {
            errors.push(format!("store {:?}: name must be 1-64 characters", store.name));
        }
        if !(1..=STORE_TEXT_MAX).contains(&store.location.chars().count()) {
            errors.push(format!(
                "store {:?}: location must be 1-64 characters",
                store.name
            ));
        }

        let mut seen = HashSet::new();
        for stock in &store.products {
            let label = format!("{}/{}", store.name, stock.name);
            if !(1..=PRODUCT_NAME_MAX).contains(&stock.name.chars().count()) {
                errors.push(format!("{label}: product name must be 1-128 characters"));
            }
            if stock.price <= 0 {
                errors.push(format!("{label}: price must be higher than 0"));
            }
            if stock.quantity <= 0 {
                errors.push(format!("{label}: quantity must be higher than 0"));
            }
            if !seen.insert((stock.name.as_str(), stock.category)) {
                errors.push(format!("{label}: listed twice for {}", stock.category));
            }
        }
    }

    errors
}

/// Load `file` into the database.
///
/// # Errors
///
/// Returns `SeedError` if the file is unreadable or invalid, `DATABASE_URL`
/// is unset, or an insert fails.
pub async fn run(file: &Path, reset: bool) -> Result<(), SeedError> {
    info!(path = %file.display(), "Loading seed file");
    let content = tokio::fs::read_to_string(file).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    // Validate before touching the database
    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let database_url = database_url().ok_or(SeedError::MissingEnvVar("DATABASE_URL"))?;
    let pool = db::create_pool(&database_url, SEED_MAX_CONNECTIONS).await?;
    info!("Connected to database");

    // One transaction: a failed run leaves the database as it was
    let mut tx = pool.begin().await?;

    if reset {
        sqlx::query("TRUNCATE store_products, products, stores")
            .execute(&mut *tx)
            .await?;
        info!("Existing inventory removed");
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            info!(stores = existing, "Already seeded, skipping (use --reset to reseed)");
            return Ok(());
        }
    }

    let mut stock_rows = 0_usize;

    for seed_store in seed.stores {
        let store = db::insert_store(
            &mut *tx,
            &StoreInput {
                name: seed_store.name,
                location: seed_store.location,
            },
        )
        .await?;

        for item in seed_store.products {
            db::insert_stock(
                &mut *tx,
                store.id,
                &NewStoreProduct {
                    name: item.name,
                    category: item.category,
                    quantity: item.quantity,
                    price: item.price,
                },
            )
            .await?;
            stock_rows += 1;
        }

        info!(store = %store.name, id = %store.id, "Seeded store");
    }

    tx.commit().await?;
    info!(stock_rows, "Seeding complete!");
    Ok(())
}
