//! Domain models for the inventory API.
//!
//! Models serialize to the camelCase JSON shapes the API returns; filter
//! types are the validated, typed form of each list endpoint's query string.

pub mod product;
pub mod store;
pub mod store_product;

pub use product::{Product, ProductFilter, ProductOrderBy};
pub use store::{Store, StoreFilter, StoreInput, StoreOrderBy, TransferSummary};
pub use store_product::{
    NewStoreProduct, ProductSummary, StockUpdate, StoreProduct, StoreProductFilter,
    StoreProductOrderBy,
};
