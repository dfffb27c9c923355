//! List results and pagination parameters.
//!
//! [`ResultList`] pairs one page of decoded models with the total number of
//! documents the filters matched. [`PaginationParams`] turns a payload's
//! zero-based `page` and `page_size` into a query limit and offset.

use serde::{Deserialize, Serialize};

/// One page of models plus the pre-pagination match count.
///
/// `count` is computed before ordering, limit and offset are applied, and
/// before decoding: a document that fails to decode is missing from `data`
/// but still counted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultList<T> {
    /// Total count of matching documents across all pages.
    pub count: usize,
    /// The models on the requested page.
    pub data: Vec<T>,
}

impl<T> ResultList<T> {
    pub fn new(count: usize, data: Vec<T>) -> Self {
        Self { count, data }
    }

    /// A result with no matches.
    pub fn empty() -> Self {
        Self { count: 0, data: Vec::new() }
    }
}

impl<T> Default for ResultList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Zero-based pagination.
///
/// A `page_size` of zero means "no limit". Page `n` skips `n * page_size`
/// documents, so page 0 is always the first page and a page index without a
/// page size skips nothing.
///
/// # Example
///
/// ```ignore
/// use modelstore::page::PaginationParams;
///
/// let params = PaginationParams::new(2, 50);
/// assert_eq!(params.limit(), Some(50));
/// assert_eq!(params.offset(), Some(100));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationParams {
    /// The page index (0-indexed).
    pub page: usize,
    /// Number of items per page, zero for unlimited.
    pub page_size: usize,
}

impl PaginationParams {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Maximum number of documents to fetch, if bounded.
    pub fn limit(&self) -> Option<usize> {
        (self.page_size > 0).then_some(self.page_size)
    }

    /// Number of documents to skip, if any page past the first was requested.
    pub fn offset(&self) -> Option<usize> {
        (self.page > 0).then(|| self.page.saturating_mul(self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_offset() {
        let params = PaginationParams::new(0, 10);
        assert_eq!(params.limit(), Some(10));
        assert_eq!(params.offset(), None);
    }

    #[test]
    fn offset_is_page_times_size() {
        let params = PaginationParams::new(1, 2);
        assert_eq!(params.offset(), Some(2));

        let params = PaginationParams::new(4, 25);
        assert_eq!(params.offset(), Some(100));
    }

    #[test]
    fn zero_page_size_is_unbounded() {
        let params = PaginationParams::new(3, 0);
        assert_eq!(params.limit(), None);
        assert_eq!(params.offset(), Some(0));
    }

    #[test]
    fn result_list_serializes_count_and_data() {
        let list = ResultList::new(7, vec![1, 2]);
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value, serde_json::json!({ "Count": 7, "Data": [1, 2] }));
    }
}
