//! Pagination policy: chunk a flat item list into fixed-capacity pages.

use crate::item::Item;

/// An ordered run of items shown on one screen of the grid.
pub type Page = Vec<Item>;

/// Split `items` into consecutive pages of at most `capacity` items.
///
/// Input order is preserved and every item's `page_index` is rewritten to
/// the page it lands on.  An empty input yields a single empty page, since a
/// paged grid always has something to show.  A `capacity` of `0` is treated
/// as `1`.
pub fn paginate(items: Vec<Item>, capacity: usize) -> Vec<Page> {
    let capacity = capacity.max(1);
    if items.is_empty() {
        return vec![Vec::new()];
    }

    let mut pages: Vec<Page> = Vec::with_capacity(items.len().div_ceil(capacity));
    for mut item in items {
        if pages.last().map_or(true, |p| p.len() >= capacity) {
            pages.push(Vec::with_capacity(capacity));
        }
        let page_index = pages.len() - 1;
        item.set_page_index(page_index);
        if let Some(page) = pages.last_mut() {
            page.push(item);
        }
    }
    pages
}

/// Concatenate pages back into one sequence.  Folders stay a single item.
pub fn flatten(pages: Vec<Page>) -> Vec<Item> {
    pages.into_iter().flatten().collect()
}
