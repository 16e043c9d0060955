//! Query-string parsing for the listing endpoints.
//!
//! Rules shared by every listing:
//! - `page`/`limit` absent or empty fall back to the defaults; anything else
//!   must be a base-10 integer with `page >= 1` and `1 <= limit <= 100`.
//! - Text filters (`name`, `location`) treat the empty string as "no filter".
//! - `category`, `orderBy` and `orderDir` must be one of the allowed values.

use std::collections::HashMap;

use inventory_core::{PageRequest, ProductCategory, SortDirection};

use super::{FromQuery, IssueCode, Issues, ValidationIssue};
use crate::models::{
    ProductFilter, ProductOrderBy, StoreFilter, StoreOrderBy, StoreProductFilter,
    StoreProductOrderBy,
};

/// A parameter's value, or `None` when absent or empty.
fn present<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn integer(params: &HashMap<String, String>, key: &str) -> Result<Option<i64>, ValidationIssue> {
    present(params, key)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                ValidationIssue::new(IssueCode::InvalidType, key, "Expected an integer")
            })
        })
        .transpose()
}

fn page_request(params: &HashMap<String, String>, issues: &mut Issues) -> Option<PageRequest> {
    let page = issues.check(integer(params, "page").and_then(|page| {
        match page.unwrap_or(i64::from(PageRequest::DEFAULT_PAGE)) {
            p if p < 1 => Err(ValidationIssue::new(
                IssueCode::TooSmall,
                "page",
                "Must be at least 1",
            )),
            p => u32::try_from(p).map_err(|_| {
                ValidationIssue::new(IssueCode::TooBig, "page", "Page is too large")
            }),
        }
    }));

    let limit = issues.check(integer(params, "limit").and_then(|limit| {
        match limit.unwrap_or(i64::from(PageRequest::DEFAULT_LIMIT)) {
            l if l < 1 => Err(ValidationIssue::new(
                IssueCode::TooSmall,
                "limit",
                "Must be at least 1",
            )),
            l if l > i64::from(PageRequest::MAX_LIMIT) => Err(ValidationIssue::new(
                IssueCode::TooBig,
                "limit",
                format!("Must be at most {}", PageRequest::MAX_LIMIT),
            )),
            // Bounded by MAX_LIMIT above.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            l => Ok(l as u32),
        }
    }));

    PageRequest::new(page?, limit?)
}

fn category(
    params: &HashMap<String, String>,
    issues: &mut Issues,
) -> Option<Option<ProductCategory>> {
    issues.check(
        present(params, "category")
            .map(|raw| {
                raw.parse::<ProductCategory>().map_err(|_| {
                    ValidationIssue::new(IssueCode::InvalidValue, "category", "Invalid category")
                })
            })
            .transpose(),
    )
}

fn direction(params: &HashMap<String, String>, issues: &mut Issues) -> Option<SortDirection> {
    issues.check(
        present(params, "orderDir")
            .map(|raw| {
                raw.parse::<SortDirection>().map_err(|()| {
                    ValidationIssue::new(
                        IssueCode::InvalidValue,
                        "orderDir",
                        one_of(&["asc", "desc"]),
                    )
                })
            })
            .transpose()
            .map(Option::unwrap_or_default),
    )
}

fn order_by<T: Default>(
    params: &HashMap<String, String>,
    issues: &mut Issues,
    allowed: &[&str],
    from_label: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    issues.check(match present(params, "orderBy") {
        None => Ok(T::default()),
        Some(raw) => from_label(raw).ok_or_else(|| {
            ValidationIssue::new(IssueCode::InvalidValue, "orderBy", one_of(allowed))
        }),
    })
}

fn one_of(allowed: &[&str]) -> String {
    let options: Vec<String> = allowed.iter().map(|v| format!("\"{v}\"")).collect();
    format!("Invalid option: expected one of {}", options.join("|"))
}

fn text(params: &HashMap<String, String>, key: &str) -> Option<String> {
    present(params, key).map(str::to_owned)
}

impl FromQuery for ProductFilter {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<ValidationIssue>> {
        let mut issues = Issues::default();
        let page = page_request(params, &mut issues);
        let category = category(params, &mut issues);
        let order_by = order_by(
            params,
            &mut issues,
            ProductOrderBy::ALLOWED,
            ProductOrderBy::from_label,
        );
        let direction = direction(params, &mut issues);

        issues.finish(|| {
            Some(Self {
                name: text(params, "name"),
                category: category?,
                order_by: order_by?,
                direction: direction?,
                page: page?,
            })
        })
    }
}

impl FromQuery for StoreFilter {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<ValidationIssue>> {
        let mut issues = Issues::default();
        let page = page_request(params, &mut issues);
        let order_by = order_by(
            params,
            &mut issues,
            StoreOrderBy::ALLOWED,
            StoreOrderBy::from_label,
        );
        let direction = direction(params, &mut issues);

        issues.finish(|| {
            Some(Self {
                name: text(params, "name"),
                location: text(params, "location"),
                order_by: order_by?,
                direction: direction?,
                page: page?,
            })
        })
    }
}

impl FromQuery for StoreProductFilter {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, Vec<ValidationIssue>> {
        let mut issues = Issues::default();
        let page = page_request(params, &mut issues);
        let category = category(params, &mut issues);
        let order_by = order_by(
            params,
            &mut issues,
            StoreProductOrderBy::ALLOWED,
            StoreProductOrderBy::from_label,
        );
        let direction = direction(params, &mut issues);

        issues.finish(|| {
            Some(Self {
                name: text(params, "name"),
                category: category?,
                order_by: order_by?,
                direction: direction?,
                page: page?,
            })
        })
    }
}
