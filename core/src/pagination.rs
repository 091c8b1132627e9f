//! Offset/limit page arithmetic.
//!
//! Pages are zero-based. The store only knows `_start`/`_limit`, so every
//! page boundary is derived here from a page index and a fixed page size.

/// Items per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// First collection index covered by `page_index`.
pub fn offset(page_index: usize, page_size: usize) -> usize {
    page_index.saturating_mul(page_size)
}

/// `ceil(total_count / page_size)`. An empty collection has zero pages.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size)
}

/// Highest valid page index; 0 when there are no pages at all.
pub fn last_page(total_pages: usize) -> usize {
    total_pages.saturating_sub(1)
}

pub fn can_go_prev(page_index: usize) -> bool {
    page_index > 0
}

pub fn can_go_next(page_index: usize, total_pages: usize) -> bool {
    page_index + 1 < total_pages
}

/// Number of items the store should return for `page_index`.
pub fn page_len(page_index: usize, page_size: usize, total_count: usize) -> usize {
    total_count
        .saturating_sub(offset(page_index, page_size))
        .min(page_size)
}
