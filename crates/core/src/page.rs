//! Client-side pagination for admin tables.

/// One page of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// 1-based page number actually served (after clamping).
    pub number: usize,
    /// Requested page size.
    pub per_page: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice out page `number` (1-based) of `items`.
///
/// Page 0 is treated as page 1 and pages past the end are clamped to the
/// last page. A `per_page` of 0 is treated as 1.
#[must_use]
pub fn paginate<T>(items: &[T], number: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let number = number.clamp(1, total_pages);

    let start = (number - 1) * per_page;
    let end = (start + per_page).min(total_items);

    Page {
        items: items.get(start..end).unwrap_or_default(),
        number,
        per_page,
        total_items,
        total_pages,
    }
}
