//! Product catalog service.

use sqlx::PgPool;
use tracing::{info, instrument};

use inventory_core::{Page, ProductCategory, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::models::{Product, ProductFilter};

/// Message for a product ID that matches no row.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Service for the product catalog.
#[derive(Clone)]
pub struct ProductsService {
    pool: PgPool,
}

impl ProductsService {
    /// Create a new products service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products along with the unpaginated total.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if either query fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, filter: &ProductFilter) -> Result<Page<Product>, AppError> {
        let repo = ProductRepository::new(&self.pool);
        let results = repo.list(filter).await?;
        let total = repo.count(filter).await?;

        Ok(Page::new(results, filter.page, total))
    }

    /// Delete a product and every stock row referencing it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has this ID.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AppError> {
        match ProductRepository::new(&self.pool).delete(id).await {
            Ok(()) => {
                info!("Product deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Every product category, in declaration order.
    #[must_use]
    pub const fn categories() -> &'static [ProductCategory] {
        &ProductCategory::ALL
    }
}
