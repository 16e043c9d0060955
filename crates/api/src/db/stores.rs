//! Database operations for stores.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use inventory_core::StoreId;

use super::{RepositoryError, contains_pattern, direction_sql};
use crate::models::{Store, StoreFilter, StoreInput, StoreOrderBy, TransferSummary};

/// Shared `WHERE` clause of the listing and count queries.
const STORE_FILTER: &str = r"
    WHERE ($1::text IS NULL OR s.name ILIKE $1)
      AND ($2::text IS NULL OR s.location ILIKE $2)
";

/// Total stocked units of the store aliased `s`.
const PRODUCTS_QUANTITY: &str = r"
    COALESCE((SELECT SUM(sp.quantity) FROM store_products sp WHERE sp.store_id = s.id), 0)::BIGINT
";

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    location: String,
    products_quantity: i64,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
            products_quantity: row.products_quantity,
            created_at: row.created_at,
        }
    }
}

const fn order_column(order_by: StoreOrderBy) -> &'static str {
    match order_by {
        StoreOrderBy::CreatedAt => "s.created_at",
        StoreOrderBy::Name => "s.name",
        StoreOrderBy::Location => "s.location",
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let sql = format!(
            r"
            SELECT s.id, s.name, s.location, s.created_at,
                   {PRODUCTS_QUANTITY} AS products_quantity
            FROM stores s
            WHERE s.id = $1
            "
        );

        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// List one page of stores matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &StoreFilter) -> Result<Vec<Store>, RepositoryError> {
        let direction = direction_sql(filter.direction);
        let sql = format!(
            r"
            SELECT s.id, s.name, s.location, s.created_at,
                   {PRODUCTS_QUANTITY} AS products_quantity
            FROM stores s
            {STORE_FILTER}
            ORDER BY {column} {direction}, s.id {direction}
            LIMIT $3 OFFSET $4
            ",
            column = order_column(filter.order_by),
        );

        let rows = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.location.as_deref().map(contains_pattern))
            .bind(i64::from(filter.page.limit()))
            .bind(filter.page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count every store matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &StoreFilter) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM stores s {STORE_FILTER}");

        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.location.as_deref().map(contains_pattern))
            .fetch_one(self.pool)
            .await?;

        Ok(total)
    }

    /// Create a store. A new store has no stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &StoreInput) -> Result<Store, RepositoryError> {
        insert_store(self.pool, input).await
    }

    /// Replace a store's name and location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no store has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: StoreId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let sql = format!(
            r"
            UPDATE stores s
            SET name = $2, location = $3
            WHERE s.id = $1
            RETURNING s.id, s.name, s.location, s.created_at,
                      {PRODUCTS_QUANTITY} AS products_quantity
            "
        );

        let row = sqlx::query_as::<_, StoreRow>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .fetch_optional(self.pool)
            .await
            .map_err(RepositoryError::from_write)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a store (and, by cascade, its stock rows).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no store has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Move every stock row of `from` to `to` in a single transaction.
    ///
    /// Both store rows are locked in ID order first, so two concurrent
    /// transfers between the same pair cannot deadlock, and new stock cannot
    /// be added to the source meanwhile. The source stock rows are locked
    /// before they are copied. A product already
    /// stocked by `to` keeps its destination price and gains the source
    /// quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if either store does not exist.
    /// Returns `RepositoryError::Database` if any statement fails.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn transfer_products(
        &self,
        from: StoreId,
        to: StoreId,
    ) -> Result<TransferSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked: Vec<uuid::Uuid> = sqlx::query_scalar(
            "SELECT id FROM stores WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![from.as_uuid(), to.as_uuid()])
        .fetch_all(&mut *tx)
        .await?;

        if !locked.contains(&from.as_uuid()) || !locked.contains(&to.as_uuid()) {
            return Err(RepositoryError::NotFound);
        }

        if from == to {
            tx.commit().await?;
            return Ok(TransferSummary::default());
        }

        // Pending stock updates and deletes on the source must land before the copy.
        sqlx::query("SELECT 1 FROM store_products WHERE store_id = $1 FOR UPDATE")
            .bind(from)
            .execute(&mut *tx)
            .await?;

        let overlapping: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM store_products src
            WHERE src.store_id = $1
              AND EXISTS (
                  SELECT 1 FROM store_products dst
                  WHERE dst.store_id = $2 AND dst.product_id = src.product_id
              )
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        let copied = sqlx::query(
            r"
            INSERT INTO store_products (store_id, product_id, price, quantity, created_at)
            SELECT $2, product_id, price, quantity, created_at
            FROM store_products
            WHERE store_id = $1
            ON CONFLICT ON CONSTRAINT store_products_pkey
            DO UPDATE SET quantity = store_products.quantity + EXCLUDED.quantity
            ",
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?
        .rows_affected();

        sqlx::query("DELETE FROM store_products WHERE store_id = $1")
            .bind(from)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let merged = u64::try_from(overlapping).unwrap_or_default();
        Ok(TransferSummary {
            moved: copied.saturating_sub(merged),
            merged,
        })
    }
}

/// Insert a store on any executor (pool or open transaction).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_store<'e>(
    executor: impl PgExecutor<'e>,
    input: &StoreInput,
) -> Result<Store, RepositoryError> {
    let row = sqlx::query_as::<_, StoreRow>(
        r"
        INSERT INTO stores (name, location)
        VALUES ($1, $2)
        RETURNING id, name, location, created_at, 0::BIGINT AS products_quantity
        ",
    )
    .bind(&input.name)
    .bind(&input.location)
    .fetch_one(executor)
    .await
    .map_err(RepositoryError::from_write)?;

    Ok(row.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use inventory_core::ProductCategory;

    use super::*;
    use crate::db::{ProductRepository, StoreProductRepository, test_pool};
    use crate::models::NewStoreProduct;

    fn store_input(name: &str) -> StoreInput {
        StoreInput {
            name: name.to_owned(),
            location: "Test City".to_owned(),
        }
    }

    fn stock(name: &str, quantity: i32) -> NewStoreProduct {
        NewStoreProduct {
            name: name.to_owned(),
            category: ProductCategory::Home,
            quantity,
            price: 1500,
        }
    }

    #[test]
    fn test_order_columns() {
        assert_eq!(order_column(StoreOrderBy::CreatedAt), "s.created_at");
        assert_eq!(order_column(StoreOrderBy::Name), "s.name");
        assert_eq!(order_column(StoreOrderBy::Location), "s.location");
    }

    // =========================================================================
    // Database Tests
    // =========================================================================

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (DATABASE_URL)"]
    async fn test_products_quantity_sums_stock() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let stock_rows = StoreProductRepository::new(&pool);
        let token = uuid::Uuid::new_v4().simple().to_string();

        let store = stores.create(&store_input(&token)).await.unwrap();
        assert_eq!(store.products_quantity, 0);
        let fetched = stores.get(store.id).await.unwrap().unwrap();
        assert_eq!(fetched.products_quantity, 0);

        let lamp = stock_rows
            .create(store.id, &stock(&format!("lamp-{token}"), 3))
            .await
            .unwrap();
        let rug = stock_rows
            .create(store.id, &stock(&format!("rug-{token}"), 4))
            .await
            .unwrap();
        let fetched = stores.get(store.id).await.unwrap().unwrap();
        assert_eq!(fetched.products_quantity, 7);

        stores.delete(store.id).await.unwrap();
        let products = ProductRepository::new(&pool);
        products.delete(lamp.product.id).await.unwrap();
        products.delete(rug.product.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (DATABASE_URL)"]
    async fn test_transfer_keeps_update_committed_during_transfer() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let token = uuid::Uuid::new_v4().simple().to_string();

        let source = stores.create(&store_input(&format!("from-{token}"))).await.unwrap();
        let destination = stores.create(&store_input(&format!("to-{token}"))).await.unwrap();
        let item = StoreProductRepository::new(&pool)
            .create(source.id, &stock(&format!("vase-{token}"), 1))
            .await
            .unwrap();

        // Hold an uncommitted update on the source row while the transfer starts
        let mut pending = pool.begin().await.unwrap();
        sqlx::query(
            "UPDATE store_products SET quantity = 50 WHERE store_id = $1 AND product_id = $2",
        )
        .bind(source.id)
        .bind(item.product.id)
        .execute(&mut *pending)
        .await
        .unwrap();

        let transfer = tokio::spawn({
            let pool = pool.clone();
            async move {
                StoreRepository::new(&pool)
                    .transfer_products(source.id, destination.id)
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        pending.commit().await.unwrap();

        let summary = transfer.await.unwrap().unwrap();
        assert_eq!(summary, TransferSummary { moved: 1, merged: 0 });

        let source_after = stores.get(source.id).await.unwrap().unwrap();
        let destination_after = stores.get(destination.id).await.unwrap().unwrap();
        assert_eq!(source_after.products_quantity, 0);
        assert_eq!(destination_after.products_quantity, 50);

        stores.delete(source.id).await.unwrap();
        stores.delete(destination.id).await.unwrap();
        ProductRepository::new(&pool)
            .delete(item.product.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (DATABASE_URL)"]
    async fn test_transfer_does_not_revive_stock_deleted_during_transfer() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let token = uuid::Uuid::new_v4().simple().to_string();

        let source = stores.create(&store_input(&format!("from-{token}"))).await.unwrap();
        let destination = stores.create(&store_input(&format!("to-{token}"))).await.unwrap();
        let item = StoreProductRepository::new(&pool)
            .create(source.id, &stock(&format!("clock-{token}"), 2))
            .await
            .unwrap();

        let mut pending = pool.begin().await.unwrap();
        sqlx::query("DELETE FROM store_products WHERE store_id = $1 AND product_id = $2")
            .bind(source.id)
            .bind(item.product.id)
            .execute(&mut *pending)
            .await
            .unwrap();

        let transfer = tokio::spawn({
            let pool = pool.clone();
            async move {
                StoreRepository::new(&pool)
                    .transfer_products(source.id, destination.id)
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        pending.commit().await.unwrap();

        let summary = transfer.await.unwrap().unwrap();
        assert_eq!(summary, TransferSummary::default());

        let destination_after = stores.get(destination.id).await.unwrap().unwrap();
        assert_eq!(destination_after.products_quantity, 0);

        stores.delete(source.id).await.unwrap();
        stores.delete(destination.id).await.unwrap();
        ProductRepository::new(&pool)
            .delete(item.product.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (DATABASE_URL)"]
    async fn test_rolled_back_inserts_leave_nothing_behind() {
        let pool = test_pool().await;
        let token = uuid::Uuid::new_v4().simple().to_string();

        let mut tx = pool.begin().await.unwrap();
        let store = insert_store(&mut *tx, &store_input(&token)).await.unwrap();
        crate::db::insert_stock(&mut *tx, store.id, &stock(&format!("shelf-{token}"), 2))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert!(StoreRepository::new(&pool).get(store.id).await.unwrap().is_none());
        let filter = crate::models::ProductFilter {
            name: Some(format!("shelf-{token}")),
            ..crate::models::ProductFilter::default()
        };
        assert_eq!(ProductRepository::new(&pool).count(&filter).await.unwrap(), 0);
    }
}
