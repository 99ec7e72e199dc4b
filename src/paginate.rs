//! Filtering and pagination over the merged list.
//!
//! The remote API cannot filter by status, so page windows and counts
//! are always derived here from the effective list.

use crate::model::{Item, StatusFilter};

/// Keep the items matching `status`, preserving order.
#[must_use]
pub fn filter_by_status(items: &[Item], status: StatusFilter) -> Vec<Item> {
    items
        .iter()
        .filter(|item| status.matches(item.completed))
        .cloned()
        .collect()
}

/// The window `[(page-1)*per_page, page*per_page)`, clamped to bounds.
///
/// `page` and `per_page` must be at least 1; `PageQuery` guarantees it.
#[must_use]
pub fn paginate(items: &[Item], page: usize, per_page: usize) -> &[Item] {
    debug_assert!(page >= 1 && per_page >= 1);
    let start = page.saturating_sub(1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Number of pages for `count` items; never less than 1.
#[must_use]
pub fn total_pages(count: usize, per_page: usize) -> usize {
    debug_assert!(per_page >= 1);
    count.div_ceil(per_page.max(1)).max(1)
}

/// Page to show after an item was removed from `page`.
///
/// Steps back one page when the current page became empty.
#[must_use]
pub fn page_after_removal(
    items: &[Item],
    status: StatusFilter,
    page: usize,
    per_page: usize,
) -> usize {
    let filtered = filter_by_status(items, status);
    if page > 1 && paginate(&filtered, page, per_page).is_empty() {
        page - 1
    } else {
        page
    }
}

/// Apply `update` to the item with `id`, if present.
///
/// Returns whether an item was updated.
pub fn update_in_list(items: &mut [Item], id: i64, update: impl FnOnce(&mut Item)) -> bool {
    match items.iter_mut().find(|item| item.id == id) {
        Some(item) => {
            update(item);
            true
        }
        None => false,
    }
}

/// Remove the item with `id`. Returns whether one was removed.
pub fn remove_from_list(items: &mut Vec<Item>, id: i64) -> bool {
    let before = items.len();
    items.retain(|item| item.id != id);
    items.len() != before
}

/// Put a newly created item at the front.
pub fn prepend_to_list(items: &mut Vec<Item>, item: Item) {
    items.insert(0, item);
}
