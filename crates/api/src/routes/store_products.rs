//! Handlers for the stock of a single store.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use inventory_core::{ApiResponse, Page, ProductId, StoreId};

use super::parse_id;
use crate::error::AppError;
use crate::models::{NewStoreProduct, StockUpdate, StoreProduct, StoreProductFilter};
use crate::services::store_products::STORE_PRODUCT_NOT_FOUND;
use crate::services::stores::STORE_NOT_FOUND;
use crate::state::AppState;
use crate::validation::{ValidJson, ValidQuery};

/// Both IDs of a stock row; either one malformed means no such row.
fn stock_key(store_id: &str, product_id: &str) -> Result<(StoreId, ProductId), AppError> {
    Ok((
        parse_id(store_id, STORE_PRODUCT_NOT_FOUND)?,
        parse_id(product_id, STORE_PRODUCT_NOT_FOUND)?,
    ))
}

/// `GET /api/stores/{id}/products`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidQuery(filter): ValidQuery<StoreProductFilter>,
) -> Result<Json<ApiResponse<Page<StoreProduct>>>, AppError> {
    let store_id = parse_id(&id, STORE_NOT_FOUND)?;
    let page = state
        .store_products()
        .get_store_products(store_id, &filter)
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// `POST /api/stores/{id}/products`
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<NewStoreProduct>,
) -> Result<(StatusCode, Json<ApiResponse<StoreProduct>>), AppError> {
    let store_id = parse_id(&id, STORE_NOT_FOUND)?;
    let created = state
        .store_products()
        .create_store_product(store_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// `PUT /api/stores/{id}/products/{product_id}`
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
    ValidJson(update): ValidJson<StockUpdate>,
) -> Result<Json<ApiResponse<StoreProduct>>, AppError> {
    let (store_id, product_id) = stock_key(&id, &product_id)?;
    let updated = state
        .store_products()
        .update_store_product(store_id, product_id, update)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// `DELETE /api/stores/{id}/products/{product_id}`
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let (store_id, product_id) = stock_key(&id, &product_id)?;
    state
        .store_products()
        .delete_store_product(store_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
