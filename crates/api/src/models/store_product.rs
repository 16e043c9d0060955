//! Store product (stock record) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventory_core::{PageRequest, ProductCategory, ProductId, SortDirection, StoreId};

/// Stock of one product in one store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    /// Store holding the stock.
    pub store_id: StoreId,
    /// Unit price in cents.
    pub price: i32,
    /// Units in stock.
    pub quantity: i32,
    /// When the stock record was created.
    pub created_at: DateTime<Utc>,
    /// The stocked product.
    pub product: ProductSummary,
}

/// Product fields embedded in a [`StoreProduct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
}

/// Input for adding a product to a store.
///
/// The product is looked up by (name, category) and created when missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoreProduct {
    pub name: String,
    pub category: ProductCategory,
    pub quantity: i32,
    pub price: i32,
}

/// Input for changing the price and quantity of existing stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
    pub quantity: i32,
    pub price: i32,
}

/// Sortable columns of a store's product listing.
///
/// `Name` and `Category` sort on the joined product; `Price` and `Quantity`
/// on the stock row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreProductOrderBy {
    #[default]
    CreatedAt,
    Name,
    Category,
    Price,
    Quantity,
}

impl StoreProductOrderBy {
    /// Values a client may pass as `orderBy`.
    pub const ALLOWED: &'static [&'static str] = &["name", "category", "price", "quantity"];

    /// Parse a client-supplied `orderBy` value.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "name" => Some(Self::Name),
            "category" => Some(Self::Category),
            "price" => Some(Self::Price),
            "quantity" => Some(Self::Quantity),
            _ => None,
        }
    }
}

/// Validated filters for listing a store's products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreProductFilter {
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    /// Exact product category.
    pub category: Option<ProductCategory>,
    /// Sort column.
    pub order_by: StoreProductOrderBy,
    /// Sort direction.
    pub direction: SortDirection,
    /// Requested page.
    pub page: PageRequest,
}
