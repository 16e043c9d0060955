//! Offset pagination types shared by every list endpoint.

use core::str::FromStr;

use serde::Serialize;

/// A validated page request.
///
/// `page` is 1-based. Construct through [`PageRequest::new`] so the bounds
/// below always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Page returned when the client does not ask for one.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when the client does not ask for one.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Largest page size a client may request.
    pub const MAX_LIMIT: u32 = 100;

    /// Create a page request, returning `None` if `page` is 0 or `limit` is
    /// outside `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Option<Self> {
        if page == 0 || limit == 0 || limit > Self::MAX_LIMIT {
            return None;
        }
        Some(Self { page, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page (at most `page_size`).
    pub results: Vec<T>,
    /// The 1-based page number that was requested.
    pub page: u32,
    /// The page size that was requested.
    pub page_size: u32,
    /// Number of rows matching the filter, ignoring pagination.
    pub total: i64,
}

impl<T> Page<T> {
    /// Assemble a page from its rows, the request that produced it and the total count.
    #[must_use]
    pub fn new(results: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            results,
            page: request.page,
            page_size: request.limit,
            total,
        }
    }
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_is_page_minus_one_times_limit() {
        assert_eq!(PageRequest::new(3, 25).unwrap().offset(), 50);
        assert_eq!(PageRequest::new(1, 100).unwrap().offset(), 0);
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let request = PageRequest::new(u32::MAX, PageRequest::MAX_LIMIT).unwrap();
        assert_eq!(request.offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(PageRequest::new(0, 10).is_none());
        assert!(PageRequest::new(1, 0).is_none());
        assert!(PageRequest::new(1, 101).is_none());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = Page::new(vec![1, 2], PageRequest::new(2, 2).unwrap(), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "results": [1, 2], "page": 2, "pageSize": 2, "total": 5 })
        );
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("DESC".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }
}
