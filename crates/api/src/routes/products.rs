//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use inventory_core::{ApiResponse, Page, ProductCategory, ProductId};

use super::parse_id;
use crate::error::AppError;
use crate::models::{Product, ProductFilter};
use crate::services::ProductsService;
use crate::services::products::PRODUCT_NOT_FOUND;
use crate::state::AppState;
use crate::validation::ValidQuery;

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<ProductFilter>,
) -> Result<Json<ApiResponse<Page<Product>>>, AppError> {
    let page = state.products().get_products(&filter).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// `GET /api/products/categories`
pub async fn categories() -> Json<ApiResponse<&'static [ProductCategory]>> {
    Json(ApiResponse::ok(ProductsService::categories()))
}

/// `DELETE /api/products/{id}`
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id: ProductId = parse_id(&id, PRODUCT_NOT_FOUND)?;
    state.products().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
