//! Store service.

use sqlx::PgPool;
use tracing::{info, instrument};

use inventory_core::{Page, StoreId};

use crate::db::{RepositoryError, StoreRepository};
use crate::error::AppError;
use crate::models::{Store, StoreFilter, StoreInput, TransferSummary};

/// Message for a store ID that matches no row.
pub const STORE_NOT_FOUND: &str = "Store not found";

/// Map a repository miss to the store-specific 404.
fn store_error(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(STORE_NOT_FOUND.to_string()),
        other => other.into(),
    }
}

/// Service for stores.
#[derive(Clone)]
pub struct StoresService {
    pool: PgPool,
}

impl StoresService {
    /// Create a new stores service.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a store with its total stocked quantity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store has this ID.
    #[instrument(skip_all, fields(store_id = %id))]
    pub async fn get_store(&self, id: StoreId) -> Result<Store, AppError> {
        StoreRepository::new(&self.pool)
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(STORE_NOT_FOUND.to_string()))
    }

    /// List one page of stores along with the unpaginated total.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if either query fails.
    #[instrument(skip(self))]
    pub async fn get_stores(&self, filter: &StoreFilter) -> Result<Page<Store>, AppError> {
        let repo = StoreRepository::new(&self.pool);
        let results = repo.list(filter).await?;
        let total = repo.count(filter).await?;

        Ok(Page::new(results, filter.page, total))
    }

    /// Create an empty store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the insert fails.
    #[instrument(skip_all, fields(name = %input.name))]
    pub async fn create_store(&self, input: &StoreInput) -> Result<Store, AppError> {
        let store = StoreRepository::new(&self.pool).create(input).await?;
        info!(store_id = %store.id, "Store created");
        Ok(store)
    }

    /// Replace a store's name and location.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store has this ID.
    #[instrument(skip_all, fields(store_id = %id))]
    pub async fn update_store(&self, id: StoreId, input: &StoreInput) -> Result<Store, AppError> {
        StoreRepository::new(&self.pool)
            .update(id, input)
            .await
            .map_err(store_error)
    }

    /// Delete a store together with its stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no store has this ID.
    #[instrument(skip_all, fields(store_id = %id))]
    pub async fn delete_store(&self, id: StoreId) -> Result<(), AppError> {
        StoreRepository::new(&self.pool)
            .delete(id)
            .await
            .map_err(store_error)?;
        info!("Store deleted");
        Ok(())
    }

    /// Move all stock of `from` into `to`.
    ///
    /// Products already stocked by `to` have the quantities added up; the
    /// destination price wins.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if either store does not exist.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn transfer_store_products(
        &self,
        from: StoreId,
        to: StoreId,
    ) -> Result<TransferSummary, AppError> {
        let summary = StoreRepository::new(&self.pool)
            .transfer_products(from, to)
            .await
            .map_err(store_error)?;

        info!(
            moved = summary.moved,
            merged = summary.merged,
            "Store products transferred"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_store_error_maps_missing_row_to_404() {
        let err = store_error(RepositoryError::NotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), STORE_NOT_FOUND);
    }

    #[test]
    fn test_store_error_keeps_other_failures_internal() {
        let err = store_error(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
