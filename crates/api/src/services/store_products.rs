//! Per-store stock service.

use sqlx::PgPool;
use tracing::{info, instrument};

use inventory_core::{Page, ProductId, StoreId};

use super::stores::STORE_NOT_FOUND;
use crate::db::{RepositoryError, StoreProductRepository};
use crate::error::AppError;
use crate::models::{NewStoreProduct, StockUpdate, StoreProduct, StoreProductFilter};

/// Message for a (store, product) pair with no stock row.
pub const STORE_PRODUCT_NOT_FOUND: &str = "Store product not found";

/// Message for adding a product the store already stocks.
pub const STORE_PRODUCT_EXISTS: &str = "Store product already exists";

fn stock_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(STORE_PRODUCT_NOT_FOUND.to_string()),
        other => other.into(),
    }
}

fn create_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::Internal(STORE_PRODUCT_EXISTS.to_string()),
        RepositoryError::ForeignKey(_) => AppError::NotFound(STORE_NOT_FOUND.to_string()),
        other => other.into(),
    }
}

/// Service for the stock held by each store.
#[derive(Clone)]
pub struct StoreProductsService {
    pool: PgPool,
}

impl StoreProductsService {
    /// Create a new store products service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List one page of a store's stock.
    ///
    /// An unknown store yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if either query fails.
    #[instrument(skip_all, fields(store_id = %store_id))]
    pub async fn get_store_products(
        &self,
        store_id: StoreId,
        filter: &StoreProductFilter,
    ) -> Result<Page<StoreProduct>, AppError> {
        let repo = StoreProductRepository::new(&self.pool);
        let results = repo.list(store_id, filter).await?;
        let total = repo.count(store_id, filter).await?;

        Ok(Page::new(results, filter.page, total))
    }

    /// Add stock of a product (found or created by name and category).
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the store does not exist.
    /// Returns `AppError::Internal` if the store already stocks the product.
    #[instrument(skip_all, fields(store_id = %store_id, name = %input.name))]
    pub async fn create_store_product(
        &self,
        store_id: StoreId,
        input: &NewStoreProduct,
    ) -> Result<StoreProduct, AppError> {
        let created = StoreProductRepository::new(&self.pool)
            .create(store_id, input)
            .await
            .map_err(create_error)?;

        info!(product_id = %created.product.id, "Store product created");
        Ok(created)
    }

    /// Set the price and quantity of existing stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the store does not stock the product.
    #[instrument(skip_all, fields(store_id = %store_id, product_id = %product_id))]
    pub async fn update_store_product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        update: StockUpdate,
    ) -> Result<StoreProduct, AppError> {
        StoreProductRepository::new(&self.pool)
            .update(store_id, product_id, update)
            .await
            .map_err(stock_error)
    }

    /// Remove a product from a store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the store does not stock the product.
    #[instrument(skip_all, fields(store_id = %store_id, product_id = %product_id))]
    pub async fn delete_store_product(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<(), AppError> {
        StoreProductRepository::new(&self.pool)
            .delete(store_id, product_id)
            .await
            .map_err(stock_error)
    }
}
