//! JSON body parsing for the write endpoints.

use serde_json::{Map, Value};

use inventory_core::{ProductCategory, StoreId};

use super::{FromJson, IssueCode, Issues, ValidationIssue};
use crate::models::{NewStoreProduct, StockUpdate, StoreInput};

const STORE_TEXT_MAX: usize = 64;
const PRODUCT_NAME_MAX: usize = 128;

const QUANTITY_MESSAGE: &str = "Must be higher than 0";
const PRICE_MESSAGE: &str = "Price must be a higher than 0 (in cents)";

/// Body of `POST /stores/{id}/transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub destination_store_id: StoreId,
}

fn object(value: &Value) -> Result<&Map<String, Value>, Vec<ValidationIssue>> {
    value.as_object().ok_or_else(|| {
        vec![ValidationIssue::request(
            IssueCode::InvalidType,
            "Invalid input: expected object",
        )]
    })
}

/// A required, non-empty string of at most `max` characters.
fn bounded_string(
    body: &Map<String, Value>,
    key: &str,
    max: usize,
    empty_message: &str,
) -> Result<String, ValidationIssue> {
    let Some(Value::String(s)) = body.get(key) else {
        return Err(ValidationIssue::new(
            IssueCode::InvalidType,
            key,
            "Invalid input: expected string",
        ));
    };

    match s.chars().count() {
        0 => Err(ValidationIssue::new(IssueCode::TooSmall, key, empty_message)),
        n if n > max => Err(ValidationIssue::new(
            IssueCode::TooBig,
            key,
            format!("Too big: expected string to have <={max} characters"),
        )),
        _ => Ok(s.clone()),
    }
}

/// A required integer `> 0` that fits the `INTEGER` column.
///
/// Integral floats such as `5.0` count as integers.
#[allow(clippy::cast_possible_truncation)]
fn positive_int(
    body: &Map<String, Value>,
    key: &str,
    too_small: &str,
) -> Result<i32, ValidationIssue> {
    let Some(Value::Number(n)) = body.get(key) else {
        return Err(ValidationIssue::new(
            IssueCode::InvalidType,
            key,
            "Invalid input: expected number",
        ));
    };

    let too_big = || {
        ValidationIssue::new(
            IssueCode::TooBig,
            key,
            format!("Too big: expected number to be <={}", i32::MAX),
        )
    };

    let int = match n.as_i64() {
        Some(int) => int,
        None => {
            let float = n.as_f64().unwrap_or(f64::NAN);
            // Non-positive floats fail the positivity rule before the integer rule.
            if float <= 0.0 {
                return Err(ValidationIssue::new(IssueCode::TooSmall, key, too_small));
            }
            if !float.is_finite() || float.fract() != 0.0 {
                return Err(ValidationIssue::new(
                    IssueCode::InvalidType,
                    key,
                    "Invalid input: expected int, received number",
                ));
            }
            if float > f64::from(i32::MAX) {
                return Err(too_big());
            }
            float as i64
        }
    };

    if int <= 0 {
        return Err(ValidationIssue::new(IssueCode::TooSmall, key, too_small));
    }
    i32::try_from(int).map_err(|_| too_big())
}

fn category(body: &Map<String, Value>) -> Result<ProductCategory, ValidationIssue> {
    body.get("category")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ValidationIssue::new(IssueCode::InvalidValue, "category", "Invalid category"))
}

impl FromJson for StoreInput {
    fn from_json(value: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let body = object(value)?;
        let mut issues = Issues::default();

        let name = issues.check(bounded_string(
            body,
            "name",
            STORE_TEXT_MAX,
            "Name is required",
        ));
        let location = issues.check(bounded_string(
            body,
            "location",
            STORE_TEXT_MAX,
            "Location is required",
        ));

        issues.finish(|| {
            Some(Self {
                name: name?,
                location: location?,
            })
        })
    }
}

impl FromJson for NewStoreProduct {
    fn from_json(value: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let body = object(value)?;
        let mut issues = Issues::default();

        let name = issues.check(bounded_string(
            body,
            "name",
            PRODUCT_NAME_MAX,
            "Name is required",
        ));
        let category = issues.check(category(body));
        let quantity = issues.check(positive_int(body, "quantity", QUANTITY_MESSAGE));
        let price = issues.check(positive_int(body, "price", PRICE_MESSAGE));

        issues.finish(|| {
            Some(Self {
                name: name?,
                category: category?,
                quantity: quantity?,
                price: price?,
            })
        })
    }
}

impl FromJson for StockUpdate {
    fn from_json(value: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let body = object(value)?;
        let mut issues = Issues::default();

        let quantity = issues.check(positive_int(body, "quantity", QUANTITY_MESSAGE));
        let price = issues.check(positive_int(body, "price", PRICE_MESSAGE));

        issues.finish(|| {
            Some(Self {
                quantity: quantity?,
                price: price?,
            })
        })
    }
}

impl FromJson for TransferRequest {
    fn from_json(value: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let body = object(value)?;

        body.get("destinationStoreId")
            .and_then(Value::as_str)
            .and_then(|raw| StoreId::parse(raw).ok())
            .map(|destination_store_id| Self {
                destination_store_id,
            })
            .ok_or_else(|| {
                vec![ValidationIssue::new(
                    IssueCode::InvalidFormat,
                    "destinationStoreId",
                    "destinationStoreId must be a valid UUID",
                )]
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_store_input_accepts_valid_body() {
        let input =
            StoreInput::from_json(&json!({"name": "My Store", "location": "New York"})).unwrap();
        assert_eq!(input.name, "My Store");
        assert_eq!(input.location, "New York");
    }

    #[test]
    fn test_store_input_reports_each_missing_field() {
        let issues = StoreInput::from_json(&json!({"name": ""})).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "Name is required");
        assert_eq!(issues[0].code, IssueCode::TooSmall);
        assert_eq!(issues[1].path, vec!["location".to_string()]);
        assert_eq!(issues[1].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_store_text_is_limited_to_64_characters() {
        let long = "x".repeat(65);
        let issues =
            StoreInput::from_json(&json!({"name": long, "location": "Paris"})).unwrap_err();
        assert_eq!(issues[0].code, IssueCode::TooBig);

        let exact = "é".repeat(64);
        assert!(StoreInput::from_json(&json!({"name": exact, "location": "Paris"})).is_ok());
    }

    #[test]
    fn test_non_object_body() {
        let issues = StoreInput::from_json(&json!(["name"])).unwrap_err();
        assert!(issues[0].path.is_empty());
    }

    #[test]
    fn test_new_store_product_valid() {
        let input = NewStoreProduct::from_json(&json!({
            "name": "T-shirt",
            "category": "Clothing",
            "quantity": 5,
            "price": 3499
        }))
        .unwrap();
        assert_eq!(input.category, ProductCategory::Clothing);
        assert_eq!(input.quantity, 5);
        assert_eq!(input.price, 3499);
    }

    #[test]
    fn test_zero_quantity_and_price_are_rejected() {
        let issues = NewStoreProduct::from_json(&json!({
            "name": "T-shirt",
            "category": "Clothing",
            "quantity": 0,
            "price": 0
        }))
        .unwrap_err();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, QUANTITY_MESSAGE);
        assert_eq!(issues[1].message, PRICE_MESSAGE);
    }

    #[test]
    fn test_fractional_and_string_numbers_are_rejected() {
        let issues = StockUpdate::from_json(&json!({"quantity": 1.5, "price": "100"})).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.code == IssueCode::InvalidType));
    }

    #[test]
    fn test_integral_floats_are_accepted() {
        let update = StockUpdate::from_json(&json!({"quantity": 5.0, "price": 1250.0})).unwrap();
        assert_eq!(update.quantity, 5);
        assert_eq!(update.price, 1250);
    }

    #[test]
    fn test_integral_float_beyond_integer_column_is_too_big() {
        let issues = StockUpdate::from_json(&json!({"quantity": 3.0e9, "price": 1})).unwrap_err();
        assert_eq!(issues[0].code, IssueCode::TooBig);
    }

    #[test]
    fn test_negative_float_is_too_small() {
        let issues = StockUpdate::from_json(&json!({"quantity": -0.5, "price": 10})).unwrap_err();
        assert_eq!(issues[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_quantity_must_fit_integer_column() {
        let issues =
            StockUpdate::from_json(&json!({"quantity": 3_000_000_000_i64, "price": 1})).unwrap_err();
        assert_eq!(issues[0].code, IssueCode::TooBig);
    }

    #[test]
    fn test_unknown_category_is_invalid() {
        let issues = NewStoreProduct::from_json(&json!({
            "name": "Car",
            "category": "Vehicles",
            "quantity": 1,
            "price": 1
        }))
        .unwrap_err();
        assert_eq!(issues[0].message, "Invalid category");
    }

    #[test]
    fn test_transfer_requires_uuid() {
        let id = uuid::Uuid::new_v4();
        let request =
            TransferRequest::from_json(&json!({"destinationStoreId": id.to_string()})).unwrap();
        assert_eq!(request.destination_store_id.as_uuid(), id);

        let issues = TransferRequest::from_json(&json!({"destinationStoreId": "abc"})).unwrap_err();
        assert_eq!(issues[0].message, "destinationStoreId must be a valid UUID");
        assert!(TransferRequest::from_json(&json!({})).is_err());
    }
}
