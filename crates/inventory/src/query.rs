//! List queries and page results.

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Page size for every list request.
pub const PER_PAGE: u32 = 20;

/// Parameters of one list request. Rebuilt from client state every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub search: Option<String>,
}

impl ListQuery {
    /// `page` is clamped to 1; a blank search means no filter.
    pub fn new(page: u32, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            page: page.max(1),
            search,
        }
    }

    pub fn per_page(&self) -> u32 {
        PER_PAGE
    }

    /// Query-string pairs in wire order: `page`, `per_page`, then `search` if set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs
    }
}

/// Wire shape of the list response's `pagination` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

/// Wire shape of `GET /inventory`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// One page of items, normalized.
///
/// `page` and `total_pages` are always at least 1; the backend reports zero
/// pages for an empty result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<ListResponse> for PageResult {
    fn from(resp: ListResponse) -> Self {
        Self {
            items: resp.items,
            page: resp.pagination.page.max(1),
            total_pages: resp.pagination.pages.max(1),
            total_count: resp.pagination.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_omit_blank_search() {
        let q = ListQuery::new(2, Some("   "));
        assert_eq!(q.search, None);
        assert_eq!(
            q.to_pairs(),
            vec![("page", "2".to_string()), ("per_page", "20".to_string())]
        );
    }

    #[test]
    fn query_pairs_include_trimmed_search() {
        let q = ListQuery::new(0, Some(" AB "));
        assert_eq!(q.page, 1);
        assert_eq!(q.to_pairs().last(), Some(&("search", "AB".to_string())));
    }

    #[test]
    fn page_result_takes_server_pagination() {
        let resp: ListResponse = serde_json::from_value(json!({
            "items": [{
                "id": 1, "code": "AB1234", "name": "Widget", "quantity": 2,
                "created_at": "2024-01-05T14:30:00"
            }],
            "pagination": { "page": 3, "pages": 4, "per_page": 20, "total": 61 }
        }))
        .unwrap();

        let page = PageResult::from(resp);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.total_count, 61);
    }

    #[test]
    fn empty_result_normalizes_to_one_page() {
        let resp: ListResponse = serde_json::from_value(json!({
            "items": [],
            "pagination": { "page": 1, "pages": 0, "total": 0 }
        }))
        .unwrap();
        let page = PageResult::from(resp);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let resp: ListResponse = serde_json::from_value(json!({})).unwrap();
        let page = PageResult::from(resp);
        assert!(page.items.is_empty());
        assert_eq!((page.page, page.total_pages, page.total_count), (1, 1, 0));
    }
}
