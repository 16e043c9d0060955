//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::{ProductsService, StoreProductsService, StoresService};

/// Application state shared across all handlers.
///
/// Cheap to clone: everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    products: ProductsService,
    stores: StoresService,
    store_products: StoreProductsService,
}

impl AppState {
    /// Build the state and the services on top of `pool`.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                products: ProductsService::new(pool.clone()),
                stores: StoresService::new(pool.clone()),
                store_products: StoreProductsService::new(pool.clone()),
                config,
                pool,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn products(&self) -> &ProductsService {
        &self.inner.products
    }

    #[must_use]
    pub fn stores(&self) -> &StoresService {
        &self.inner.stores
    }

    #[must_use]
    pub fn store_products(&self) -> &StoreProductsService {
        &self.inner.store_products
    }
}
