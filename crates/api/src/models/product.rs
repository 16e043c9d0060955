//! Product domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventory_core::{PageRequest, ProductCategory, ProductId, SortDirection};

/// A catalog product, shared across stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name (unique together with the category).
    pub name: String,
    /// Product category.
    pub category: ProductCategory,
    /// Number of stores stocking this product.
    pub stores_count: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

/// Sortable columns of the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrderBy {
    #[default]
    CreatedAt,
    Name,
    Category,
}

impl ProductOrderBy {
    /// Values a client may pass as `orderBy`.
    pub const ALLOWED: &'static [&'static str] = &["name", "category"];

    /// Parse a client-supplied `orderBy` value.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// Validated filters for listing products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Exact category.
    pub category: Option<ProductCategory>,
    /// Sort column.
    pub order_by: ProductOrderBy,
    /// Sort direction.
    pub direction: SortDirection,
    /// Requested page.
    pub page: PageRequest,
}
