//! Client-side pagination over the filtered file list
//!
//! Pagination is derived state: it is recomputed from the number of
//! filtered entries whenever that set changes, and the current page
//! always snaps back to the first one when that happens.

use std::ops::RangeInclusive;

/// Default number of entries shown per page
pub const DEFAULT_PER_PAGE: usize = 20;

/// Number of page links shown on each side of the current page
const WINDOW_RADIUS: i64 = 5;

/// Page bookkeeping for the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Entries per page (always > 0)
    pub per_page: usize,
    /// 1-based index of the page being shown
    pub current_page: usize,
    /// ceil(filtered / per_page)
    pub total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            current_page: 1,
            total_pages: 0,
        }
    }
}

impl PaginationState {
    /// Recompute for a new filtered count, keeping `per_page`
    pub fn recompute(&mut self, filtered_count: usize) {
        *self = update_pagination(filtered_count, self.per_page);
    }

    /// Navigate and store the result clamped into `[1, max(total_pages, 1)]`
    pub fn goto(&mut self, target: i64, relative: bool) {
        let requested = goto_page(self.current_page as i64, target, relative);
        let last = self.total_pages.max(1) as i64;
        self.current_page = requested.clamp(1, last) as usize;
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page numbers to show in the navigation bar
    pub fn window(&self) -> RangeInclusive<i64> {
        page_window(self.current_page as i64, self.total_pages as i64)
    }

    /// Index range of the current page inside the filtered list
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.current_page as i64 - 1) * self.per_page as i64;
        let start = start.max(0) as usize;
        let end = start.saturating_add(self.per_page);
        (start.min(len), end.min(len))
    }
}

/// Build fresh pagination for `filtered_count` entries.
///
/// A zero `per_page` falls back to [`DEFAULT_PER_PAGE`].
pub fn update_pagination(filtered_count: usize, per_page: usize) -> PaginationState {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };

    PaginationState {
        per_page,
        current_page: 1,
        total_pages: filtered_count.div_ceil(per_page),
    }
}

/// Resolve a navigation request. Not clamped: callers guard the range.
pub fn goto_page(current_page: i64, target: i64, relative: bool) -> i64 {
    if relative {
        current_page + target
    } else {
        target
    }
}

/// Contiguous page numbers around `current_page`.
///
/// The lower bound reaches one page further back than the upper bound
/// reaches forward, e.g. page 10 of 20 yields `4..=15`.
pub fn page_window(current_page: i64, total_pages: i64) -> RangeInclusive<i64> {
    let start = (current_page - 1 - WINDOW_RADIUS).max(1);
    let end = (current_page + WINDOW_RADIUS).min(total_pages);
    start..=end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_arithmetic() {
        let state = update_pagination(45, 20);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.current_page, 1);

        let state = update_pagination(40, 20);
        assert_eq!(state.total_pages, 2);

        let state = update_pagination(0, 20);
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_zero_per_page_uses_default() {
        let state = update_pagination(41, 0);
        assert_eq!(state.per_page, DEFAULT_PER_PAGE);
        assert_eq!(state.total_pages, 3);
    }

    #[test]
    fn test_recompute_resets_page() {
        let mut state = update_pagination(100, 10);
        state.goto(7, false);
        assert_eq!(state.current_page, 7);

        state.recompute(100);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.per_page, 10);
    }

    #[test]
    fn test_goto_page_is_unclamped() {
        assert_eq!(goto_page(3, 2, true), 5);
        assert_eq!(goto_page(3, -5, true), -2);
        assert_eq!(goto_page(3, 42, false), 42);
    }

    #[test]
    fn test_goto_clamps_stored_page() {
        let mut state = update_pagination(45, 20);

        state.goto(1, true);
        assert_eq!(state.current_page, 2);

        state.goto(10, true);
        assert_eq!(state.current_page, 3);

        state.goto(-10, false);
        assert_eq!(state.current_page, 1);

        let mut empty = update_pagination(0, 20);
        empty.goto(1, true);
        assert_eq!(empty.current_page, 1);
    }

    #[test]
    fn test_page_window_boundaries() {
        assert_eq!(page_window(1, 3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(page_window(10, 20).collect::<Vec<_>>(), (4..=15).collect::<Vec<_>>());
        assert_eq!(page_window(20, 20).collect::<Vec<_>>(), (14..=20).collect::<Vec<_>>());
        assert_eq!(page_window(1, 0).count(), 0);
    }

    #[test]
    fn test_slice_bounds() {
        let mut state = update_pagination(45, 20);
        assert_eq!(state.slice_bounds(45), (0, 20));

        state.goto(3, false);
        assert_eq!(state.slice_bounds(45), (40, 45));
        assert!(!state.has_next());
        assert!(state.has_previous());
    }
}
