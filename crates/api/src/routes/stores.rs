//! Store route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use inventory_core::{ApiResponse, Page, StoreId};

use super::parse_id;
use crate::error::AppError;
use crate::models::{Store, StoreFilter, StoreInput};
use crate::services::stores::STORE_NOT_FOUND;
use crate::state::AppState;
use crate::validation::{TransferRequest, ValidJson, ValidQuery};

fn store_id(raw: &str) -> Result<StoreId, AppError> {
    parse_id(raw, STORE_NOT_FOUND)
}

/// `GET /api/stores`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(filter): ValidQuery<StoreFilter>,
) -> Result<Json<ApiResponse<Page<Store>>>, AppError> {
    let page = state.stores().get_stores(&filter).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// `POST /api/stores`
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<StoreInput>,
) -> Result<(StatusCode, Json<ApiResponse<Store>>), AppError> {
    let store = state.stores().create_store(&input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(store))))
}

/// `GET /api/stores/{id}`
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Store>>, AppError> {
    let store = state.stores().get_store(store_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(store)))
}

/// `PUT /api/stores/{id}`
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<StoreInput>,
) -> Result<Json<ApiResponse<Store>>, AppError> {
    let store = state.stores().update_store(store_id(&id)?, &input).await?;
    Ok(Json(ApiResponse::ok(store)))
}

/// `DELETE /api/stores/{id}`
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.stores().delete_store(store_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/stores/{id}/transfer`
///
/// Moves every product of the store into `destinationStoreId`.
#[instrument(skip(state))]
pub async fn transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<TransferRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state
        .stores()
        .transfer_store_products(store_id(&id)?, request.destination_store_id)
        .await?;
    Ok(Json(ApiResponse::empty()))
}
