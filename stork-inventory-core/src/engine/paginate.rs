//! Paginator.

use serde::Serialize;

/// Page metadata for the pager and the "showing x–y of n" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based page actually shown (after clamping).
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    /// `0` for an empty list.
    pub total_pages: usize,
    /// Index of the first item on the page (0-based, inclusive).
    pub start_index: usize,
    /// Index past the last item on the page (exclusive).
    pub end_index: usize,
    pub has_more: bool,
}

/// One page of a sorted, filtered list.
#[derive(Debug, Clone, Copy)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub info: PageInfo,
}

/// `ceil(len / page_size)`; `page_size` is treated as at least 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Clamp `page` into `[1, total_pages]` (`1` when there are no pages).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

/// Slice `list` to `page` (clamped) of `page_size` items.
pub fn paginate<T>(list: &[T], page: usize, page_size: usize) -> PageSlice<'_, T> {
    let page_size = page_size.max(1);
    let total_count = list.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(page, total_pages);
    let start_index = ((page - 1) * page_size).min(total_count);
    let end_index = (start_index + page_size).min(total_count);

    PageSlice {
        items: &list[start_index..end_index],
        info: PageInfo {
            page,
            page_size,
            total_count,
            total_pages,
            start_index,
            end_index,
            has_more: page < total_pages,
        },
    }
}

/// Page numbers shown by the pager: at most `max_visible`, centred on
/// `current` and shifted to stay inside `[1, total]`.
pub fn page_window(current: usize, total: usize, max_visible: usize) -> Vec<usize> {
    if total == 0 || max_visible == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total);
    if end - start < max_visible - 1 {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    (start..=end).collect()
}
