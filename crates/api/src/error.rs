//! Unified error handling for the API.
//!
//! Every error becomes the standard envelope
//! (`{"data": ..., "success": false, "error": "..."}`) with a matching status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use inventory_core::ApiResponse;

use crate::db::RepositoryError;
use crate::validation::ValidationIssue;

/// Generic message returned for server-side failures.
pub const INTERNAL_MESSAGE: &str = "Something went wrong!";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("Validation failed")]
    Validation(Vec<ValidationIssue>),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Internal server error with a client-safe message.
    #[error("{0}")]
    Internal(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = self.status();
        match self {
            Self::Validation(issues) => {
                (status, Json(ApiResponse::failure_with(issues, "Validation failed")))
                    .into_response()
            }
            Self::NotFound(message) | Self::Internal(message) => {
                (status, Json(ApiResponse::<()>::failure(message))).into_response()
            }
            // Don't expose database details to clients
            Self::Database(_) => {
                (status, Json(ApiResponse::<()>::failure(INTERNAL_MESSAGE))).into_response()
            }
        }
    }
}
