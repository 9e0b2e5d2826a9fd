//! Page slicing for search results.

/// Rows shown per search results page.
pub const PAGE_SIZE: usize = 7;

/// One page of a result list that is already fully loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of rows.
    pub total_items: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Current page, 1-based.
    pub current: usize,
}

impl Pagination {
    /// Paginate `total_items` rows, clamping `requested` into range.
    pub fn new(total_items: usize, requested: usize) -> Self {
        Self::with_page_size(total_items, PAGE_SIZE, requested)
    }

    /// Paginate with a custom page size (minimum 1).
    pub fn with_page_size(total_items: usize, page_size: usize, requested: usize) -> Self {
        let mut pagination = Self {
            total_items,
            page_size: page_size.max(1),
            current: 1,
        };
        pagination.current = requested.clamp(1, pagination.last_page());
        pagination
    }

    /// Number of pages, `ceil(total_items / page_size)`. Zero for no rows.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Last navigable page. An empty list still shows page 1.
    pub fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Index of the first row on the current page.
    pub fn start(&self) -> usize {
        ((self.current - 1) * self.page_size).min(self.total_items)
    }

    /// One past the last row on the current page.
    pub fn end(&self) -> usize {
        (self.start() + self.page_size).min(self.total_items)
    }

    /// Row range of the current page.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start()..self.end()
    }

    /// Slice the current page out of the full result list.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end().min(items.len());
        let start = self.start().min(end);
        &items[start..end]
    }

    /// Whether first/previous controls are disabled.
    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// Whether next/last controls are disabled.
    pub fn is_last(&self) -> bool {
        self.current == self.last_page()
    }

    /// Previous page number, clamped.
    pub fn previous(&self) -> usize {
        self.current.saturating_sub(1).max(1)
    }

    /// Next page number, clamped.
    pub fn next(&self) -> usize {
        (self.current + 1).min(self.last_page())
    }

    /// Numbered page links to render.
    pub fn pages(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        for (n, pages) in [(0, 0), (1, 1), (6, 1), (7, 1), (8, 2), (14, 2), (15, 3), (70, 10)] {
            assert_eq!(Pagination::new(n, 1).total_pages(), pages, "n = {n}");
        }
    }

    #[test]
    fn requested_page_is_clamped() {
        assert_eq!(Pagination::new(20, 0).current, 1);
        assert_eq!(Pagination::new(20, 99).current, 3);
        assert_eq!(Pagination::new(0, 5).current, 1);
    }

    #[test]
    fn boundary_controls() {
        let total = 20;
        let last = Pagination::new(total, 1).total_pages();
        for page in 1..=last {
            let p = Pagination::new(total, page);
            assert_eq!(p.is_first(), page == 1);
            assert_eq!(p.is_last(), page == last);
        }

        let single = Pagination::new(3, 1);
        assert!(single.is_first() && single.is_last());
    }

    #[test]
    fn slice_last_page_is_partial() {
        let rows: Vec<usize> = (0..16).collect();
        let p = Pagination::new(rows.len(), 3);
        assert_eq!(p.slice(&rows), &[14, 15]);
        assert_eq!(p.range(), 14..16);
        assert_eq!(p.previous(), 2);
        assert_eq!(p.next(), 3);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let rows: Vec<u8> = Vec::new();
        let p = Pagination::new(0, 1);
        assert!(p.slice(&rows).is_empty());
        assert_eq!(p.pages().count(), 0);
        assert!(p.is_first() && p.is_last());
    }
}
