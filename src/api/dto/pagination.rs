//! Pagination and filtering query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters of `GET /api/links`.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Restricts the listing to one owner.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl ListLinksParams {
    /// Validates pagination parameters.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Returns
    ///
    /// `(page, page_size)`, or a message naming the offending parameter.
    pub fn validated(&self) -> Result<(u32, u32), (&'static str, String)> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(("page", "Page must be greater than 0".to_string()));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err((
                "page_size",
                format!("Page size must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }

        Ok((page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> ListLinksParams {
        ListLinksParams {
            page,
            page_size,
            user_id: None,
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(params(None, None).validated().unwrap(), (1, 25));
    }

    #[test]
    fn test_custom_page_and_size() {
        assert_eq!(params(Some(3), Some(50)).validated().unwrap(), (3, 50));
    }

    #[test]
    fn test_page_zero_is_error() {
        let (field, _) = params(Some(0), None).validated().unwrap_err();
        assert_eq!(field, "page");
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).validated().is_err());
        assert!(params(None, Some(1)).validated().is_ok());
        assert!(params(None, Some(100)).validated().is_ok());
        assert!(params(None, Some(101)).validated().is_err());
    }

    #[test]
    fn test_parses_query_string_values() {
        let p: ListLinksParams = serde_json::from_str(
            r#"{"page": "2", "page_size": "10", "user_id": "6f1c2b4e-8d3a-4c55-9e1f-2a7b3c4d5e6f"}"#,
        )
        .unwrap();
        assert_eq!(p.page, Some(2));
        assert_eq!(p.page_size, Some(10));
        assert!(p.user_id.is_some());
    }
}
