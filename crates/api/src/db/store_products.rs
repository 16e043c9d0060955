//! Database operations for store stock (`store_products`).

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use inventory_core::{ProductCategory, ProductId, StoreId};

use super::products::upsert_product;
use super::{RepositoryError, contains_pattern, direction_sql};
use crate::models::{
    NewStoreProduct, ProductSummary, StockUpdate, StoreProduct, StoreProductFilter,
    StoreProductOrderBy,
};

/// `$1` is the store, `$2` a name pattern (or NULL), `$3` a category (or NULL).
const STORE_PRODUCT_FILTER: &str = r"
    WHERE sp.store_id = $1
      AND ($2::text IS NULL OR p.name ILIKE $2)
      AND ($3::product_category IS NULL OR p.category = $3)
";

/// Stock row joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct StoreProductRow {
    store_id: StoreId,
    price: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    product_id: ProductId,
    product_name: String,
    product_category: ProductCategory,
}

impl From<StoreProductRow> for StoreProduct {
    fn from(row: StoreProductRow) -> Self {
        Self {
            store_id: row.store_id,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
            product: ProductSummary {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
            },
        }
    }
}

/// Stock row without the product columns, returned by the insert.
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    store_id: StoreId,
    price: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
}

const fn order_column(order_by: StoreProductOrderBy) -> &'static str {
    match order_by {
        StoreProductOrderBy::CreatedAt => "sp.created_at",
        StoreProductOrderBy::Name => "p.name",
        StoreProductOrderBy::Category => "p.category",
        StoreProductOrderBy::Price => "sp.price",
        StoreProductOrderBy::Quantity => "sp.quantity",
    }
}

/// Repository for store stock operations.
pub struct StoreProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreProductRepository<'a> {
    /// Create a new store product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of a store's stock, joined with product details.
    ///
    /// An unknown store simply has no rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        store_id: StoreId,
        filter: &StoreProductFilter,
    ) -> Result<Vec<StoreProduct>, RepositoryError> {
        let direction = direction_sql(filter.direction);
        let sql = format!(
            r"
            SELECT
                sp.store_id, sp.price, sp.quantity, sp.created_at,
                p.id AS product_id, p.name AS product_name, p.category AS product_category
            FROM store_products sp
            JOIN products p ON p.id = sp.product_id
            {STORE_PRODUCT_FILTER}
            ORDER BY {column} {direction}, sp.product_id {direction}
            LIMIT $4 OFFSET $5
            ",
            column = order_column(filter.order_by),
        );

        let rows = sqlx::query_as::<_, StoreProductRow>(&sql)
            .bind(store_id)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.category)
            .bind(i64::from(filter.page.limit()))
            .bind(filter.page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count a store's stock rows matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(
        &self,
        store_id: StoreId,
        filter: &StoreProductFilter,
    ) -> Result<i64, RepositoryError> {
        let sql = format!(
            r"
            SELECT COUNT(*)
            FROM store_products sp
            JOIN products p ON p.id = sp.product_id
            {STORE_PRODUCT_FILTER}
            "
        );

        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(store_id)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.category)
            .fetch_one(self.pool)
            .await?;

        Ok(total)
    }

    /// Stock a product in a store, creating the product if it is new.
    ///
    /// The product upsert and the stock insert share one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store already stocks the product.
    /// Returns `RepositoryError::ForeignKey` if the store does not exist.
    /// Returns `RepositoryError::Database` for any other failure.
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &NewStoreProduct,
    ) -> Result<StoreProduct, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let created = insert_stock(&mut *tx, store_id, input).await?;
        tx.commit().await?;

        Ok(created)
    }

    /// Set the price and quantity of existing stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not stock the product.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        store_id: StoreId,
        product_id: ProductId,
        update: StockUpdate,
    ) -> Result<StoreProduct, RepositoryError> {
        let row = sqlx::query_as::<_, StoreProductRow>(
            r"
            UPDATE store_products sp
            SET quantity = $3, price = $4
            FROM products p
            WHERE sp.store_id = $1 AND sp.product_id = $2 AND p.id = sp.product_id
            RETURNING
                sp.store_id, sp.price, sp.quantity, sp.created_at,
                p.id AS product_id, p.name AS product_name, p.category AS product_category
            ",
        )
        .bind(store_id)
        .bind(product_id)
        .bind(update.quantity)
        .bind(update.price)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Remove a product from a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not stock the product.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        store_id: StoreId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM store_products WHERE store_id = $1 AND product_id = $2")
                .bind(store_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Upsert the product and insert the stock row on one connection.
///
/// Callers wrap this in a transaction so a failed insert leaves no
/// orphan product behind.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the store already stocks the product.
/// Returns `RepositoryError::ForeignKey` if the store does not exist.
/// Returns `RepositoryError::Database` for any other failure.
pub async fn insert_stock(
    conn: &mut PgConnection,
    store_id: StoreId,
    input: &NewStoreProduct,
) -> Result<StoreProduct, RepositoryError> {
    let product = upsert_product(&mut *conn, &input.name, input.category).await?;

    let row = sqlx::query_as::<_, StockRow>(
        r"
        INSERT INTO store_products (store_id, product_id, price, quantity)
        VALUES ($1, $2, $3, $4)
        RETURNING store_id, price, quantity, created_at
        ",
    )
    .bind(store_id)
    .bind(product.id)
    .bind(input.price)
    .bind(input.quantity)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::from_write)?;

    Ok(StoreProduct {
        store_id: row.store_id,
        price: row.price,
        quantity: row.quantity,
        created_at: row.created_at,
        product,
    })
}
