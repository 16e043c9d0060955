//! Request validation.
//!
//! Query strings and JSON bodies are parsed into typed parameter records
//! explicitly; nothing is coerced implicitly. A failed parse yields every
//! problem found as a list of [`ValidationIssue`]s, which the handlers
//! never see: the [`ValidQuery`] and [`ValidJson`] extractors reject the
//! request with a 422 envelope first.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn list(ValidQuery(filter): ValidQuery<StoreFilter>) -> impl IntoResponse {
//!     // `filter` is fully validated here
//! }
//! ```

pub mod payload;
pub mod query;

use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::Serialize;

use crate::error::AppError;

pub use payload::TransferRequest;

/// Machine-readable kind of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Field missing or of the wrong JSON type.
    InvalidType,
    /// Number or string below its lower bound.
    TooSmall,
    /// Number or string above its upper bound.
    TooBig,
    /// Value outside an allowed set.
    InvalidValue,
    /// String not in the expected format (UUID, integer, JSON).
    InvalidFormat,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    /// Path to the offending field; empty for whole-request problems.
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue for a top-level field.
    pub fn new(code: IssueCode, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            path: vec![field.to_owned()],
            message: message.into(),
        }
    }

    /// Create an issue about the request as a whole.
    pub fn request(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            path: Vec::new(),
            message: message.into(),
        }
    }
}

/// Collects issues while a record is parsed field by field.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<ValidationIssue>);

impl Issues {
    /// Record the error of a field check, keeping the value on success.
    pub(crate) fn check<T>(&mut self, result: Result<T, ValidationIssue>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(issue) => {
                self.0.push(issue);
                None
            }
        }
    }

    /// Finish parsing: `Ok` only if no issue was recorded.
    pub(crate) fn finish<T>(
        self,
        build: impl FnOnce() -> Option<T>,
    ) -> Result<T, Vec<ValidationIssue>> {
        if !self.0.is_empty() {
            return Err(self.0);
        }
        build().ok_or_else(|| vec![ValidationIssue::request(IssueCode::InvalidType, "Invalid input")])
    }
}

/// Parameters parsed from a query string.
pub trait FromQuery: Sized {
    /// Parse and validate raw query parameters.
    ///
    /// # Errors
    ///
    /// Returns every issue found.
    fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<ValidationIssue>>;
}

/// Parameters parsed from a JSON body.
pub trait FromJson: Sized {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns every issue found.
    fn from_json(value: &serde_json::Value) -> Result<Self, Vec<ValidationIssue>>;
}

/// Extractor for a validated query string.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: FromQuery,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|rejection| {
                AppError::Validation(vec![ValidationIssue::request(
                    IssueCode::InvalidFormat,
                    rejection.body_text(),
                )])
            })?;

        T::from_query(&params).map(Self).map_err(AppError::Validation)
    }
}

/// Extractor for a validated JSON body.
///
/// Malformed JSON and a missing `Content-Type` are validation failures too.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: FromJson,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(vec![ValidationIssue::request(
                    IssueCode::InvalidFormat,
                    rejection.body_text(),
                )])
            })?;

        T::from_json(&value).map(Self).map_err(AppError::Validation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_serializes_like_a_field_error() {
        let issue = ValidationIssue::new(IssueCode::TooSmall, "price", "Must be higher than 0");
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["code"], "too_small");
        assert_eq!(json["path"], serde_json::json!(["price"]));
        assert_eq!(json["message"], "Must be higher than 0");
    }

    #[test]
    fn test_request_issue_has_empty_path() {
        let issue = ValidationIssue::request(IssueCode::InvalidFormat, "bad body");
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_issues_finish_reports_everything_collected() {
        let mut issues = Issues::default();
        for field in ["name", "location"] {
            issues.check(Err::<(), _>(ValidationIssue::new(
                IssueCode::InvalidType,
                field,
                "Invalid input: expected string",
            )));
        }

        let result: Result<(), _> = issues.finish(|| Some(()));
        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].path, vec!["location".to_string()]);
    }

    #[test]
    fn test_issues_check_keeps_ok_values() {
        let mut issues = Issues::default();
        let value = issues.check(Ok::<_, ValidationIssue>(5));
        assert_eq!(value, Some(5));

        let missing = issues.check(Err::<i32, _>(ValidationIssue::new(
            IssueCode::TooBig,
            "limit",
            "Too big",
        )));
        assert_eq!(missing, None);
        assert!(issues.finish(|| Some(())).is_err());
    }
}
