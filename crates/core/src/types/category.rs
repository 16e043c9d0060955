//! Product category enumeration.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a [`ProductCategory`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product category: {0}")]
pub struct UnknownCategory(pub String);

/// Category a product belongs to.
///
/// Serialized with the variant name as-is (`"Electronics"`, `"Clothing"`, ...),
/// which is also the label of the `product_category` `PostgreSQL` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "product_category"))]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Food,
    Home,
    Toys,
}

impl ProductCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Electronics,
        Self::Clothing,
        Self::Food,
        Self::Home,
        Self::Toys,
    ];

    /// Returns the wire/database label of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::Food => "Food",
            Self::Home => "Home",
            Self::Toys => "Toys",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownCategory;

    /// Matching is exact (case-sensitive), like the enum labels in the database.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_labels_parse_back() {
        for category in ProductCategory::ALL {
            assert_eq!(category.as_str().parse::<ProductCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("clothing".parse::<ProductCategory>().is_err());
        assert_eq!(
            "Garden".parse::<ProductCategory>(),
            Err(UnknownCategory("Garden".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&ProductCategory::Toys).unwrap();
        assert_eq!(json, "\"Toys\"");

        let parsed: ProductCategory = serde_json::from_str("\"Home\"").unwrap();
        assert_eq!(parsed, ProductCategory::Home);
    }

    #[test]
    fn test_declaration_order() {
        let labels: Vec<&str> = ProductCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, ["Electronics", "Clothing", "Food", "Home", "Toys"]);
    }
}
