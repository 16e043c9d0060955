//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                - Liveness check
//! GET    /health/ready                          - Readiness check (database)
//!
//! # Products
//! GET    /api/products                          - Paginated product listing
//! GET    /api/products/categories               - All product categories
//! DELETE /api/products/{id}                     - Delete a product
//!
//! # Stores
//! GET    /api/stores                            - Paginated store listing
//! POST   /api/stores                            - Create a store
//! GET    /api/stores/{id}                       - Store detail
//! PUT    /api/stores/{id}                       - Replace a store
//! DELETE /api/stores/{id}                       - Delete a store
//! POST   /api/stores/{id}/transfer              - Move all stock to another store
//!
//! # Store products
//! GET    /api/stores/{id}/products              - Paginated stock listing
//! POST   /api/stores/{id}/products              - Add stock
//! PUT    /api/stores/{id}/products/{product_id} - Change price and quantity
//! DELETE /api/stores/{id}/products/{product_id} - Remove stock
//! ```

pub mod products;
pub mod store_products;
pub mod stores;

use std::str::FromStr;

use axum::{
    Router,
    extract::State,
    http::{HeaderName, Method, StatusCode, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Products
        .route("/products", get(products::list))
        .route("/products/categories", get(products::categories))
        .route("/products/{id}", delete(products::delete))
        // Stores
        .route("/stores", get(stores::list).post(stores::create))
        .route(
            "/stores/{id}",
            get(stores::get).put(stores::update).delete(stores::delete),
        )
        .route("/stores/{id}/transfer", post(stores::transfer))
        // Store products
        .route(
            "/stores/{id}/products",
            get(store_products::list).post(store_products::create),
        )
        .route(
            "/stores/{id}/products/{product_id}",
            put(store_products::update).delete(store_products::delete),
        )
}

/// Build the full application router: health checks, the API, CORS and
/// request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// The UI is served from a different origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
}

/// Parse a path ID. A malformed ID cannot name any row, so it is a 404.
pub(crate) fn parse_id<T: FromStr>(raw: &str, not_found: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
