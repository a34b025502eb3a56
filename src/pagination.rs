use serde::Serialize;

pub fn default_page() -> i64 {
    1
}

pub fn default_size() -> i64 {
    20
}

/// Clamp a raw page/size pair to sane bounds before it reaches SQL.
pub fn clamp(page: i64, size: i64) -> (i64, i64) {
    (page.max(1), size.clamp(1, 100))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: i64, size: i64, total: i64) -> Self {
        let total_pages = if total == 0 { 0 } else { (total + size - 1) / size };
        Self {
            page,
            size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of results plus its metadata, the shape every list endpoint returns.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, size: i64, total: i64) -> Self {
        Self {
            items,
            meta: PaginationMeta::new(page, size, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_25_items() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn last_page_of_25_items() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn exact_multiple_has_no_partial_page() {
        let meta = PaginationMeta::new(2, 10, 20);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn empty_result_set() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn clamp_rejects_degenerate_values() {
        assert_eq!(clamp(0, 0), (1, 1));
        assert_eq!(clamp(-3, 5000), (1, 100));
        assert_eq!(clamp(2, 20), (2, 20));
    }
}
