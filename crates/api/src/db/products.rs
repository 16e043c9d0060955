//! Database operations for products.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use inventory_core::{ProductCategory, ProductId};

use super::{RepositoryError, contains_pattern, direction_sql};
use crate::models::{Product, ProductFilter, ProductOrderBy, ProductSummary};

/// Shared `WHERE` clause of the listing and count queries.
///
/// `$1` is an `ILIKE` pattern (or NULL), `$2` a category (or NULL).
const PRODUCT_FILTER: &str = r"
    WHERE ($1::text IS NULL OR p.name ILIKE $1)
      AND ($2::product_category IS NULL OR p.category = $2)
";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product listing queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    category: ProductCategory,
    stores_count: i64,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            stores_count: row.stores_count,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for the product upsert.
#[derive(Debug, sqlx::FromRow)]
struct ProductSummaryRow {
    id: ProductId,
    name: String,
    category: ProductCategory,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
        }
    }
}

/// Column expression for each sortable field.
const fn order_column(order_by: ProductOrderBy) -> &'static str {
    match order_by {
        ProductOrderBy::CreatedAt => "p.created_at",
        ProductOrderBy::Name => "p.name",
        ProductOrderBy::Category => "p.category",
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let direction = direction_sql(filter.direction);
        let sql = format!(
            r"
            SELECT
                p.id, p.name, p.category, p.created_at,
                (SELECT COUNT(*) FROM store_products sp WHERE sp.product_id = p.id) AS stores_count
            FROM products p
            {PRODUCT_FILTER}
            ORDER BY {column} {direction}, p.id {direction}
            LIMIT $3 OFFSET $4
            ",
            column = order_column(filter.order_by),
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.category)
            .bind(i64::from(filter.page.limit()))
            .bind(filter.page.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count every product matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM products p {PRODUCT_FILTER}");

        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.category)
            .fetch_one(self.pool)
            .await?;

        Ok(total)
    }

    /// Delete a product (and, by cascade, its stock rows).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

}

/// Find-or-create a product on any executor (pool or open transaction).
///
/// The conflict branch performs a no-op update so `RETURNING` yields the
/// existing row.
pub(crate) async fn upsert_product<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    category: ProductCategory,
) -> Result<ProductSummary, RepositoryError> {
    let row = sqlx::query_as::<_, ProductSummaryRow>(
        r"
        INSERT INTO products (name, category)
        VALUES ($1, $2)
        ON CONFLICT ON CONSTRAINT products_name_category_key
        DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, category
        ",
    )
    .bind(name)
    .bind(category)
    .fetch_one(executor)
    .await
    .map_err(RepositoryError::from_write)?;

    Ok(row.into())
}
