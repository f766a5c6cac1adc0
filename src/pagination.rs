//! Page request/response shapes shared by every list endpoint, plus the
//! pagination control derived from the latest response.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
pub const MAX_PAGE_SIZE: usize = 100;

/// `pageInfo` as sent with a search request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page_num: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn first(page_size: usize) -> Self {
        Self {
            page_num: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Builds a request from untrusted query values: a missing or zero page
    /// becomes 1, a missing or zero size becomes `default_size`, oversized
    /// pages are capped.
    pub fn from_query(page: Option<usize>, size: Option<usize>, default_size: usize) -> Self {
        let page_size = size
            .filter(|size| *size > 0)
            .unwrap_or(default_size)
            .clamp(1, MAX_PAGE_SIZE);
        Self {
            page_num: page.filter(|page| *page > 0).unwrap_or(1),
            page_size,
        }
    }

    pub const fn page_num(self) -> usize {
        self.page_num
    }

    pub const fn page_size(self) -> usize {
        self.page_size
    }

    pub fn with_page(self, page_num: usize) -> Self {
        Self {
            page_num: page_num.max(1),
            ..self
        }
    }
}

/// Request body of every `/search` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a, C: ?Sized> {
    pub search_condition: &'a C,
    pub page_info: PageRequest,
}

/// `pageInfo` as returned by the backend.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_num: usize,
    pub page_size: usize,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub total_pages: usize,
}

impl PageInfo {
    /// Placeholder shown before the first response arrives.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            page_num: request.page_num(),
            page_size: request.page_size(),
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page_num > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_num.saturating_mul(self.page_size) < self.total_items
    }

    /// One-based index range of the rows shown on this page.
    pub fn range(&self) -> (usize, usize) {
        if self.total_items == 0 || self.page_size == 0 {
            return (0, 0);
        }
        let first = (self.page_num.saturating_sub(1) * self.page_size + 1).min(self.total_items);
        let last = (self.page_num * self.page_size).min(self.total_items);
        (first, last)
    }

    /// `"1-10 of 23"`.
    pub fn summary(&self) -> String {
        let (first, last) = self.range();
        format!("{first}-{last} of {}", self.total_items)
    }
}

/// `{ pageData, pageInfo }` response of every `/search` endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page_data: Vec<T>,
    pub page_info: PageInfo,
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    // `None` marks an elided run of pages.
    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Template-facing pagination widget. It owns no state of its own: every
/// field is derived from the response [`PageInfo`].
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PaginationControl {
    pub page_num: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub summary: String,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
    pub pages: Vec<Option<usize>>,
    pub size_options: Vec<usize>,
}

impl PaginationControl {
    pub fn new(info: &PageInfo) -> Self {
        let total_pages = if info.total_pages > 0 || info.page_size == 0 {
            info.total_pages
        } else {
            info.total_items.div_ceil(info.page_size)
        };

        Self {
            page_num: info.page_num,
            page_size: info.page_size,
            total_items: info.total_items,
            total_pages,
            summary: info.summary(),
            previous_page: info.has_previous().then(|| info.page_num - 1),
            next_page: info.has_next().then(|| info.page_num + 1),
            pages: get_pages(total_pages, info.page_num.max(1), 2, 2, 2, 2),
            size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(page_num: usize, page_size: usize, total_items: usize) -> PageInfo {
        PageInfo {
            page_num,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        }
    }

    #[test]
    fn page_request_from_query_applies_defaults() {
        let request = PageRequest::from_query(None, None, 10);
        assert_eq!((request.page_num(), request.page_size()), (1, 10));

        let request = PageRequest::from_query(Some(0), Some(0), 20);
        assert_eq!((request.page_num(), request.page_size()), (1, 20));

        let request = PageRequest::from_query(Some(4), Some(5000), 10);
        assert_eq!((request.page_num(), request.page_size()), (4, MAX_PAGE_SIZE));
    }

    #[test]
    fn search_request_uses_wire_names() {
        let condition = serde_json::json!({"keyword": "algebra"});
        let body = SearchRequest {
            search_condition: &condition,
            page_info: PageRequest::first(10),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "searchCondition": {"keyword": "algebra"},
                "pageInfo": {"pageNum": 1, "pageSize": 10}
            })
        );
    }

    #[test]
    fn page_reads_backend_shape() {
        let page: Page<serde_json::Value> = serde_json::from_str(
            r#"{"pageData":[{"_id":"1"}],"pageInfo":{"pageNum":2,"pageSize":10,"totalItems":11,"totalPages":2}}"#,
        )
        .unwrap();
        assert_eq!(page.page_data.len(), 1);
        assert_eq!(page.page_info, info(2, 10, 11));
    }

    #[test]
    fn summary_matches_visible_range() {
        assert_eq!(info(1, 10, 23).summary(), "1-10 of 23");
        assert_eq!(info(3, 10, 23).summary(), "21-23 of 23");
        assert_eq!(info(1, 10, 0).summary(), "0-0 of 0");
    }

    #[test]
    fn next_is_disabled_once_all_items_are_covered() {
        for total in 0..45 {
            for page in 1..6 {
                let info = info(page, 10, total);
                assert_eq!(info.has_next(), page * 10 < total);
                if page * 10 >= total {
                    assert_eq!(PaginationControl::new(&info).next_page, None);
                }
            }
        }
    }

    #[test]
    fn previous_is_disabled_on_first_page() {
        assert_eq!(PaginationControl::new(&info(1, 10, 50)).previous_page, None);
        assert_eq!(PaginationControl::new(&info(2, 10, 50)).previous_page, Some(1));
    }

    #[test]
    fn control_derives_total_pages_when_missing() {
        let control = PaginationControl::new(&PageInfo {
            page_num: 1,
            page_size: 10,
            total_items: 23,
            total_pages: 0,
        });
        assert_eq!(control.total_pages, 3);
        assert_eq!(control.pages, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn pages_are_elided_around_current() {
        let control = PaginationControl::new(&info(10, 10, 200));
        assert_eq!(
            control.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(19),
                Some(20)
            ]
        );
    }
}
