//! Domain services.
//!
//! # Services
//!
//! - `products` - Product catalog listing and deletion
//! - `stores` - Store CRUD and stock transfer between stores
//! - `store_products` - Per-store stock management
//!
//! Services own a `PgPool` handle, translate repository errors into
//! [`AppError`](crate::error::AppError)s and never let `sqlx` errors escape.

pub mod products;
pub mod store_products;
pub mod stores;

pub use products::ProductsService;
pub use store_products::StoreProductsService;
pub use stores::StoresService;
