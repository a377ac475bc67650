use serde::{Deserialize, Serialize};

use crate::config::config_model::Pagination;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A resolved, clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn resolve(query: &PaginationQuery, settings: &Pagination) -> Self {
        let page_size = query
            .page_size
            .filter(|size| *size > 0)
            .map(|size| size.min(settings.max_page_size))
            .unwrap_or(settings.page_size)
            .max(1);
        // Keeps the offset representable; such a page is always past the end.
        let page = query
            .page
            .filter(|page| *page > 0)
            .unwrap_or(1)
            .min(i64::MAX / page_size);

        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Returns `None` when the request points past the last page. Page 1 of an empty set is valid.
    pub fn new(results: Vec<T>, count: i64, request: &PageRequest) -> Option<Self> {
        let last_page = ((count + request.page_size - 1) / request.page_size).max(1);
        if request.page > last_page {
            return None;
        }

        Some(Self {
            count,
            next: (request.page < last_page).then_some(request.page + 1),
            previous: (request.page > 1).then_some(request.page - 1),
            results,
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Pagination {
        Pagination {
            page_size: 5,
            max_page_size: 100,
        }
    }

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let request = PageRequest::resolve(&PaginationQuery::default(), &settings());
        assert_eq!(request, PageRequest { page: 1, page_size: 5 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn page_size_is_capped() {
        let query = PaginationQuery {
            page: Some(3),
            page_size: Some(1000),
        };
        let request = PageRequest::resolve(&query, &settings());
        assert_eq!(request.page_size, 100);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        let query = PaginationQuery {
            page: Some(0),
            page_size: Some(-4),
        };
        let request = PageRequest::resolve(&query, &settings());
        assert_eq!(request, PageRequest { page: 1, page_size: 5 });
    }

    #[test]
    fn huge_page_number_resolves_to_an_out_of_range_page() {
        let query = PaginationQuery {
            page: Some(i64::MAX),
            page_size: Some(5),
        };
        let request = PageRequest::resolve(&query, &settings());
        assert!(request.offset() > 0);
        assert!(Page::<i32>::new(vec![], 12, &request).is_none());
    }

    #[test]
    fn links_point_to_neighbour_pages() {
        let request = PageRequest { page: 2, page_size: 5 };
        let page = Page::new(vec![6, 7, 8, 9, 10], 12, &request).unwrap();
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.next, Some(3));
        assert_eq!(page.count, 12);
    }

    #[test]
    fn empty_first_page_is_valid_but_past_the_end_is_not() {
        let first = PageRequest { page: 1, page_size: 5 };
        let page = Page::<i32>::new(vec![], 0, &first).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);

        let past = PageRequest { page: 4, page_size: 5 };
        assert!(Page::<i32>::new(vec![], 12, &past).is_none());
    }
}
