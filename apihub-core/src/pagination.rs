//! Offset pagination: `(skip, limit)` goes upstream verbatim, and the
//! response is folded back into a [`Page`] with a 1-based page number.

use crate::model::Page;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// `skip / limit + 1`, or `1` when `limit` is zero.
    pub fn page_number(&self) -> u32 {
        if self.limit > 0 { self.skip / self.limit + 1 } else { 1 }
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![("limit", self.limit.to_string()), ("skip", self.skip.to_string())]
    }

    /// Wrap one upstream page. A missing upstream total falls back to the
    /// number of items actually returned.
    pub fn paginate<T>(&self, items: Vec<T>, upstream_total: Option<u64>) -> Page<T> {
        let count = items.len();
        Page {
            items,
            count,
            page: self.page_number(),
            total_count: Some(upstream_total.unwrap_or(count as u64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_is_one_based() {
        assert_eq!(PageRequest::new(0, 20).page_number(), 1);
        assert_eq!(PageRequest::new(19, 20).page_number(), 1);
        assert_eq!(PageRequest::new(20, 20).page_number(), 2);
        assert_eq!(PageRequest::new(45, 20).page_number(), 3);
        assert_eq!(PageRequest::new(150, 1).page_number(), 151);
    }

    #[test]
    fn page_number_matches_floor_division() {
        for limit in 1..=150u32 {
            for skip in [0u32, 1, 7, 149, 150, 151, 1000] {
                assert_eq!(PageRequest::new(skip, limit).page_number(), skip / limit + 1);
            }
        }
    }

    #[test]
    fn zero_limit_is_first_page() {
        assert_eq!(PageRequest::new(0, 0).page_number(), 1);
        assert_eq!(PageRequest::new(500, 0).page_number(), 1);
    }

    #[test]
    fn query_params_forward_values_verbatim() {
        let params = PageRequest::new(40, 20).query_params();
        assert_eq!(params, vec![("limit", "20".to_string()), ("skip", "40".to_string())]);
    }

    #[test]
    fn count_reflects_returned_items_not_limit() {
        let page = PageRequest::new(40, 20).paginate(vec!["a", "b", "c"], Some(43));
        assert_eq!(page.count, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_count, Some(43));
    }

    #[test]
    fn missing_total_falls_back_to_count() {
        let page = PageRequest::default().paginate(vec![1, 2], None);
        assert_eq!(page.total_count, Some(2));
        assert_eq!(page.page, 1);
    }
}
