//! Uniform JSON response envelope.
//!
//! Every JSON endpoint answers with `{ "data": ..., "success": bool, "error"?: string }`.

use serde::{Deserialize, Serialize};

/// Response wrapper shared by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Payload; `None` serializes as `null`.
    pub data: Option<T>,
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable error message, omitted on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            success: true,
            error: None,
        }
    }

    /// Successful response with a `null` payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: None,
            success: true,
            error: None,
        }
    }

    /// Failed response with a `null` payload.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Failed response that still carries a payload (e.g. validation issues).
    #[must_use]
    pub fn failure_with(data: T, error: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            success: false,
            error: Some(error.into()),
        }
    }
}
