//! Store domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inventory_core::{PageRequest, SortDirection, StoreId};

/// A store holding inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Free-form location.
    pub location: String,
    /// Sum of quantities over every product the store stocks.
    pub products_quantity: i64,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating or fully replacing a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInput {
    pub name: String,
    pub location: String,
}

/// Sortable columns of the store listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreOrderBy {
    #[default]
    CreatedAt,
    Name,
    Location,
}

impl StoreOrderBy {
    /// Values a client may pass as `orderBy`.
    pub const ALLOWED: &'static [&'static str] = &["name", "location"];

    /// Parse a client-supplied `orderBy` value.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "name" => Some(Self::Name),
            "location" => Some(Self::Location),
            _ => None,
        }
    }
}

/// Validated filters for listing stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    /// Case-insensitive substring of the store name.
    pub name: Option<String>,
    /// Case-insensitive substring of the store location.
    pub location: Option<String>,
    /// Sort column.
    pub order_by: StoreOrderBy,
    /// Sort direction.
    pub direction: SortDirection,
    /// Requested page.
    pub page: PageRequest,
}

/// Outcome of moving every stock row from one store to another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// Rows re-attached to the destination store.
    pub moved: u64,
    /// Rows folded into a destination row for the same product.
    pub merged: u64,
}
