//! The page store and its overflow cascade.
//!
//! [`PageStore`] owns every [`Item`] on the grid.  All pages share one
//! capacity (`columns × rows`).  Operations that add an item to a page run
//! [`cascade_overflow`](PageStore::cascade_overflow) before returning, so
//! callers never observe a page holding more than `capacity` items.
//!
//! Removal is asymmetric: an under-full page is never refilled
//! from the following page.  Pages that end up completely empty are pruned
//! (the store always keeps at least one page).

use crate::item::{AppInfo, DiscoveredApp, Folder, Item, ItemId};
use crate::paging::{flatten, paginate, Page};
use crate::reorder::reorder;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Errors from page and folder operations.
///
/// None of these are fatal: the [`Launchpad`](crate::launchpad::Launchpad)
/// logs them and carries on.  An operation returning `Err` has not mutated
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The dragged item vanished or moved before the gesture committed.
    #[error("drag source is no longer valid")]
    InvalidDragSource,
    /// The dragged item was dropped onto itself.
    #[error("item dropped onto itself")]
    SelfTargetDrag,
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("item {0} is not a folder")]
    NotAFolder(ItemId),
    #[error("item {0} is not an app")]
    NotAnApp(ItemId),
    #[error("item {0} is not directly on a page")]
    NotOnPage(ItemId),
    #[error("page {0} does not exist")]
    PageOutOfRange(usize),
}

/// Where an item currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Directly in a page slot.
    OnPage { page: usize, index: usize },
    /// Inside the folder at `pages[page][index]`, at position `member`.
    InFolder {
        page: usize,
        index: usize,
        member: usize,
    },
}

impl Location {
    pub fn page(&self) -> usize {
        match *self {
            Location::OnPage { page, .. } | Location::InFolder { page, .. } => page,
        }
    }
}

/// Ordered pages of grid items with a shared per-page capacity.
#[derive(Debug, Clone)]
pub struct PageStore {
    pub(crate) pages: Vec<Page>,
    capacity: usize,
    next_id: u64,
}

impl PageStore {
    /// An empty store with a single empty page.
    pub fn new(capacity: usize) -> Self {
        Self {
            pages: vec![Vec::new()],
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Paginate already-identified items.
    pub fn from_items(items: Vec<Item>, capacity: usize) -> Self {
        let max_id = items
            .iter()
            .flat_map(|item| match item {
                Item::App(app) => vec![app.id.0],
                Item::Folder(folder) => std::iter::once(folder.id.0)
                    .chain(folder.apps.iter().map(|a| a.id.0))
                    .collect(),
            })
            .max()
            .unwrap_or(0);
        let capacity = capacity.max(1);
        Self {
            pages: paginate(items, capacity),
            capacity,
            next_id: max_id + 1,
        }
    }

    /// Assign ids to freshly discovered apps and paginate them.
    pub fn load(apps: Vec<DiscoveredApp>, capacity: usize) -> Self {
        let mut store = Self::new(capacity);
        let items: Vec<Item> = apps
            .into_iter()
            .map(|app| {
                let id = store.allocate_id();
                Item::app(id, app)
            })
            .collect();
        store.pages = paginate(items, store.capacity);
        store
    }

    /// Hand out a fresh, never reused id.
    pub fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    //  Accessors

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of page slots in use (a folder counts once).
    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find `id` on a page or inside a folder.
    pub fn locate(&self, id: ItemId) -> Option<Location> {
        for (page, items) in self.pages.iter().enumerate() {
            for (index, item) in items.iter().enumerate() {
                if item.id() == id {
                    return Some(Location::OnPage { page, index });
                }
                if let Item::Folder(folder) = item {
                    if let Some(member) = folder.position(id) {
                        return Some(Location::InFolder {
                            page,
                            index,
                            member,
                        });
                    }
                }
            }
        }
        None
    }

    /// Page-level item by id (folder members are not items on their own).
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        match self.locate(id)? {
            Location::OnPage { page, index } => self.pages.get(page)?.get(index),
            Location::InFolder { .. } => None,
        }
    }

    pub fn folder(&self, id: ItemId) -> Option<&Folder> {
        self.item(id)?.as_folder()
    }

    /// App by id, whether it sits on a page or inside a folder.
    pub fn app(&self, id: ItemId) -> Option<&AppInfo> {
        match self.locate(id)? {
            Location::OnPage { page, index } => self.pages.get(page)?.get(index)?.as_app(),
            Location::InFolder {
                page,
                index,
                member,
            } => self.pages.get(page)?.get(index)?.as_folder()?.apps.get(member),
        }
    }

    /// Every app in display order, folder members included.
    pub fn all_apps(&self) -> impl Iterator<Item = &AppInfo> {
        self.pages.iter().flatten().flat_map(|item| match item {
            Item::App(app) => std::slice::from_ref(app).iter(),
            Item::Folder(folder) => folder.apps.iter(),
        })
    }

    //  Capacity

    /// Change the per-page capacity, re-chunking all pages if it differs.
    ///
    /// Returns whether the layout was rebuilt.
    pub fn set_capacity(&mut self, capacity: usize) -> bool {
        let capacity = capacity.max(1);
        if capacity == self.capacity {
            return false;
        }
        debug!("capacity {} -> {}, repaginating", self.capacity, capacity);
        self.capacity = capacity;
        self.repaginate();
        true
    }

    /// Re-chunk every item in display order at the current capacity.
    pub fn repaginate(&mut self) {
        let items = flatten(std::mem::take(&mut self.pages));
        self.pages = paginate(items, self.capacity);
    }

    /// Move excess tail items of `start` to the head of the following page,
    /// repeating forward until every page fits.
    ///
    /// A new trailing page is appended when the last page overflows.  Each
    /// step advances one page and items are only appended while excess
    /// remains, so the loop runs at most `page_count + excess` times.
    pub fn cascade_overflow(&mut self, start: usize) {
        let mut page = start;
        while page < self.pages.len() && self.pages[page].len() > self.capacity {
            let overflow = self.pages[page].split_off(self.capacity);
            let next = page + 1;
            if next == self.pages.len() {
                debug!("page {} overflowed past the last page, appending page {}", page, next);
                self.pages.push(Vec::new());
            }
            debug!("cascading {} item(s) from page {} to page {}", overflow.len(), page, next);
            self.pages[next].splice(
                0..0,
                overflow.into_iter().map(|mut item| {
                    item.set_page_index(next);
                    item
                }),
            );
            page = next;
        }
    }

    //  Mutations

    /// Append `item` to `page` and restore the capacity invariant.
    pub fn append_to_page(&mut self, page: usize, mut item: Item) -> Result<(), GridError> {
        let items = self
            .pages
            .get_mut(page)
            .ok_or(GridError::PageOutOfRange(page))?;
        item.set_page_index(page);
        items.push(item);
        self.cascade_overflow(page);
        self.normalize();
        Ok(())
    }

    /// Remove `id` from wherever it lives and return it.
    ///
    /// Taking the second-to-last app out of a folder dissolves the folder.
    pub fn take(&mut self, id: ItemId) -> Result<Item, GridError> {
        let item = self.detach(id)?;
        self.normalize();
        Ok(item)
    }

    /// Drag-reorder on the page grid: move `dragged` onto `target`'s slot.
    ///
    /// Within one page this is a plain [`reorder`].  Across pages (or out of
    /// a folder) the item lands after the target when moving forward and
    /// before it when moving backward, and the target page cascades.
    pub fn move_item(&mut self, dragged: ItemId, target: ItemId) -> Result<(), GridError> {
        if dragged == target {
            return Err(GridError::SelfTargetDrag);
        }
        let from = self.locate(dragged).ok_or(GridError::UnknownItem(dragged))?;
        let to = match self.locate(target).ok_or(GridError::UnknownItem(target))? {
            Location::OnPage { page, index } => (page, index),
            Location::InFolder { .. } => return Err(GridError::NotOnPage(target)),
        };
        if let Location::InFolder { index, page, .. } = from {
            if (page, index) == to {
                // Dragging a member onto its own folder.
                return Err(GridError::SelfTargetDrag);
            }
        }

        if let Location::OnPage { page, index } = from {
            if page == to.0 {
                reorder(&mut self.pages[page], index, to.1);
                return Ok(());
            }
        }

        let forward = match from {
            Location::OnPage { page, index } => (page, index) < to,
            Location::InFolder { page, index, .. } => (page, index) < to,
        };
        let item = self.detach(dragged)?;
        let (page, index) = match self.locate(target) {
            Some(Location::OnPage { page, index }) => (page, index),
            _ => return Err(GridError::InvalidDragSource),
        };
        let at = if forward { index + 1 } else { index };
        self.insert_at(page, at, item);
        self.normalize();
        Ok(())
    }

    /// Move `dragged` to the end of `page` (a drop on empty page space).
    pub fn move_to_page_end(&mut self, dragged: ItemId, page: usize) -> Result<(), GridError> {
        if page >= self.pages.len() {
            return Err(GridError::PageOutOfRange(page));
        }
        let from = self.locate(dragged).ok_or(GridError::UnknownItem(dragged))?;
        if let Location::OnPage { page: p, index } = from {
            if p == page {
                let last = self.pages[page].len() - 1;
                if index != last {
                    let item = self.pages[page].remove(index);
                    self.pages[page].push(item);
                }
                return Ok(());
            }
        }
        // Detaching may dissolve a folder but never removes a page, so
        // `page` still names the destination.
        let item = self.detach(dragged)?;
        let at = self.pages[page].len();
        self.insert_at(page, at, item);
        self.normalize();
        Ok(())
    }

    /// Bring the store in line with a fresh discovery run.
    ///
    /// Apps are matched by path.  Known apps keep their slot (and folder)
    /// and pick up the new name and icon, vanished apps are removed, and
    /// newly installed apps are appended after the last item.
    pub fn sync(&mut self, apps: Vec<DiscoveredApp>) {
        let mut incoming: HashMap<PathBuf, DiscoveredApp> = HashMap::with_capacity(apps.len());
        let mut order = Vec::with_capacity(apps.len());
        for app in apps {
            if !incoming.contains_key(&app.path) {
                order.push(app.path.clone());
                incoming.insert(app.path.clone(), app);
            }
        }

        let stale: Vec<ItemId> = self
            .all_apps()
            .filter(|app| !incoming.contains_key(&app.path))
            .map(|app| app.id)
            .collect();
        for id in &stale {
            // Removal can only fail for ids we just read out of the store.
            let _ = self.detach(*id);
        }

        let mut known = HashSet::new();
        for item in self.pages.iter_mut().flatten() {
            let members = match item {
                Item::App(app) => std::slice::from_mut(app),
                Item::Folder(folder) => folder.apps.as_mut_slice(),
            };
            for app in members {
                if let Some(found) = incoming.get(&app.path) {
                    app.name.clone_from(&found.name);
                    app.icon.clone_from(&found.icon);
                }
                known.insert(app.path.clone());
            }
        }

        self.normalize();
        let last = self.pages.len() - 1;
        let mut added = 0usize;
        for path in order {
            if known.contains(&path) {
                continue;
            }
            if let Some(app) = incoming.remove(&path) {
                let id = self.allocate_id();
                let mut item = Item::app(id, app);
                item.set_page_index(last);
                self.pages[last].push(item);
                added += 1;
            }
        }
        self.cascade_overflow(last);
        self.normalize();
        debug!("sync: {} removed, {} added", stale.len(), added);
    }

    //  Internal

    /// Insert into a page slot and cascade from that page.
    pub(crate) fn insert_at(&mut self, page: usize, index: usize, mut item: Item) {
        item.set_page_index(page);
        let items = &mut self.pages[page];
        let index = index.min(items.len());
        items.insert(index, item);
        self.cascade_overflow(page);
    }

    /// Remove `id` without pruning pages, so page indices stay stable for
    /// the caller.  Folder members come back as [`Item::App`].
    pub(crate) fn detach(&mut self, id: ItemId) -> Result<Item, GridError> {
        match self.locate(id).ok_or(GridError::UnknownItem(id))? {
            Location::OnPage { page, index } => Ok(self.pages[page].remove(index)),
            Location::InFolder {
                page,
                index,
                member,
            } => {
                let Item::Folder(folder) = &mut self.pages[page][index] else {
                    return Err(GridError::InvalidDragSource);
                };
                let app = folder.apps.remove(member);
                self.dissolve_if_needed(page, index);
                Ok(Item::App(app))
            }
        }
    }

    /// Drop empty pages (keeping one) and resync every `page_index`.
    pub(crate) fn normalize(&mut self) {
        self.pages.retain(|page| !page.is_empty());
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        for (index, page) in self.pages.iter_mut().enumerate() {
            for item in page {
                item.set_page_index(index);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn app(id: u64) -> Item {
        Item::App(AppInfo {
            id: ItemId(id),
            name: format!("app-{id}"),
            icon: String::new(),
            path: format!("/apps/{id}.desktop").into(),
            page_index: 0,
        })
    }

    pub(crate) fn folder(id: u64, members: &[u64]) -> Item {
        Item::Folder(Folder {
            id: ItemId(id),
            name: "Folder".into(),
            page_index: 0,
            apps: members
                .iter()
                .map(|m| app(*m).as_app().cloned().unwrap())
                .collect(),
        })
    }

    /// Build a store whose pages are given explicitly (not re-chunked).
    pub(crate) fn store(capacity: usize, pages: Vec<Vec<Item>>) -> PageStore {
        let mut s = PageStore::from_items(Vec::new(), capacity);
        s.pages = pages;
        s.next_id = 1000;
        s.normalize();
        s
    }

    pub(crate) fn ids(store: &PageStore) -> Vec<Vec<u64>> {
        store
            .pages()
            .iter()
            .map(|p| p.iter().map(|i| i.id().0).collect())
            .collect()
    }

    pub(crate) fn assert_invariants(store: &PageStore) {
        let pages = store.pages();
        assert!(!pages.is_empty(), "store must keep a page");
        for (index, page) in pages.iter().enumerate() {
            assert!(page.len() <= store.capacity(), "page {index} over capacity");
            if index + 1 < pages.len() {
                assert!(!page.is_empty(), "non-trailing page {index} is empty");
            }
            for item in page {
                assert_eq!(item.page_index(), index);
                if let Item::Folder(f) = item {
                    assert!(f.apps.len() >= 2, "folder {} below minimum size", f.id);
                    assert!(f.apps.iter().all(|a| a.page_index == index));
                }
            }
        }
    }

    #[test]
    fn append_overflow_moves_tail_to_next_page_head() {
        // [A,B,C],[D] + E  =>  [A,B,C],[E,D]
        let mut s = store(3, vec![vec![app(1), app(2), app(3)], vec![app(4)]]);
        s.append_to_page(0, app(5)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2, 3], vec![5, 4]]);
        assert_invariants(&s);
    }

    #[test]
    fn append_overflow_creates_trailing_page() {
        // [A,B] + C  =>  [A,B],[C]
        let mut s = store(2, vec![vec![app(1), app(2)]]);
        s.append_to_page(0, app(3)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2], vec![3]]);
        assert_eq!(s.page(1).unwrap()[0].page_index(), 1);
    }

    #[test]
    fn cascade_propagates_across_full_pages() {
        let mut s = store(
            2,
            vec![vec![app(1), app(2)], vec![app(3), app(4)], vec![app(5)]],
        );
        s.append_to_page(0, app(9)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2], vec![9, 3], vec![4, 5]]);
        assert_invariants(&s);
    }

    #[test]
    fn cascade_handles_multiple_excess_items() {
        let mut s = store(1, vec![vec![app(1)]]);
        s.pages[0].extend([app(2), app(3)]);
        s.cascade_overflow(0);
        assert_eq!(ids(&s), vec![vec![1], vec![2], vec![3]]);
        assert_invariants(&s);
    }

    #[test]
    fn cascade_on_fitting_page_is_noop() {
        let mut s = store(3, vec![vec![app(1), app(2)], vec![app(3)]]);
        s.cascade_overflow(0);
        assert_eq!(ids(&s), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn append_to_missing_page_fails() {
        let mut s = store(3, vec![vec![app(1)]]);
        assert_eq!(s.append_to_page(4, app(2)), Err(GridError::PageOutOfRange(4)));
        assert_eq!(ids(&s), vec![vec![1]]);
    }

    #[test]
    fn load_assigns_ids_and_paginates() {
        let apps = (0..5)
            .map(|n| DiscoveredApp {
                name: format!("App {n}"),
                icon: String::new(),
                path: format!("/apps/{n}.desktop").into(),
            })
            .collect();
        let mut s = PageStore::load(apps, 2);
        assert_eq!(ids(&s), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert_eq!(s.allocate_id(), ItemId(6));
    }

    #[test]
    fn from_items_allocates_past_folder_members() {
        let mut s = PageStore::from_items(vec![app(1), folder(3, &[7, 8])], 4);
        assert_eq!(s.allocate_id(), ItemId(9));
    }

    #[test]
    fn locate_finds_folder_members() {
        let s = store(4, vec![vec![app(1), folder(10, &[2, 3])]]);
        assert_eq!(s.locate(ItemId(1)), Some(Location::OnPage { page: 0, index: 0 }));
        assert_eq!(
            s.locate(ItemId(3)),
            Some(Location::InFolder {
                page: 0,
                index: 1,
                member: 1
            })
        );
        assert!(s.item(ItemId(3)).is_none());
        assert_eq!(s.app(ItemId(3)).unwrap().name, "app-3");
        assert!(s.locate(ItemId(99)).is_none());
    }

    #[test]
    fn all_apps_includes_folder_members_in_order() {
        let s = store(2, vec![vec![app(1), folder(10, &[2, 3])], vec![app(4)]]);
        let order: Vec<u64> = s.all_apps().map(|a| a.id.0).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }

    #[test]
    fn take_prunes_emptied_page() {
        let mut s = store(2, vec![vec![app(1), app(2)], vec![app(3)], vec![app(4)]]);
        s.take(ItemId(3)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2], vec![4]]);
        assert_invariants(&s);
    }

    #[test]
    fn take_does_not_backfill_underfull_page() {
        let mut s = store(2, vec![vec![app(1), app(2)], vec![app(3), app(4)]]);
        s.take(ItemId(1)).unwrap();
        assert_eq!(ids(&s), vec![vec![2], vec![3, 4]]);
    }

    #[test]
    fn take_last_item_keeps_one_empty_page() {
        let mut s = store(2, vec![vec![app(1)]]);
        s.take(ItemId(1)).unwrap();
        assert_eq!(s.page_count(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn move_within_page_uses_reorder_tie_break() {
        let mut s = store(6, vec![(1..=6).map(app).collect()]);
        s.move_item(ItemId(3), ItemId(6)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2, 4, 5, 6, 3]]);
        s.move_item(ItemId(3), ItemId(2)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 3, 2, 4, 5, 6]]);
    }

    #[test]
    fn move_forward_across_pages_cascades() {
        let mut s = store(3, vec![vec![app(1), app(2), app(3)], vec![app(4), app(5), app(6)]]);
        s.move_item(ItemId(1), ItemId(5)).unwrap();
        assert_eq!(ids(&s), vec![vec![2, 3], vec![4, 5, 1], vec![6]]);
        assert_invariants(&s);
    }

    #[test]
    fn move_backward_across_pages_lands_before_target() {
        let mut s = store(3, vec![vec![app(1), app(2), app(3)], vec![app(4), app(5)]]);
        s.move_item(ItemId(5), ItemId(2)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 5, 2], vec![3, 4]]);
        assert_invariants(&s);
    }

    #[test]
    fn move_that_empties_source_page_prunes_it() {
        let mut s = store(2, vec![vec![app(1), app(2)], vec![app(3)], vec![app(4)]]);
        s.move_item(ItemId(3), ItemId(4)).unwrap();
        assert_eq!(ids(&s), vec![vec![1, 2], vec![4, 3]]);
        assert_invariants(&s);
    }

    #[test]
    fn move_onto_self_is_rejected() {
        let mut s = store(3, vec![vec![app(1), app(2)]]);
        assert_eq!(s.move_item(ItemId(1), ItemId(1)), Err(GridError::SelfTargetDrag));
    }

    #[test]
    fn move_onto_folder_member_is_rejected() {
        let mut s = store(3, vec![vec![app(1), folder(10, &[2, 3])]]);
        assert_eq!(s.move_item(ItemId(1), ItemId(2)), Err(GridError::NotOnPage(ItemId(2))));
        assert_eq!(ids(&s), vec![vec![1, 10]]);
    }

    #[test]
    fn move_to_page_end_across_pages() {
        let mut s = store(3, vec![vec![app(1), app(2), app(3)], vec![app(4)]]);
        s.move_to_page_end(ItemId(1), 1).unwrap();
        assert_eq!(ids(&s), vec![vec![2, 3], vec![4, 1]]);
        s.move_to_page_end(ItemId(2), 0).unwrap();
        assert_eq!(ids(&s), vec![vec![3, 2], vec![4, 1]]);
        assert_invariants(&s);
    }

    #[test]
    fn set_capacity_repaginates_without_flattening_folders() {
        let mut s = store(
            2,
            vec![vec![app(1), folder(10, &[2, 3])], vec![app(4), app(5)]],
        );
        assert!(s.set_capacity(3));
        assert_eq!(ids(&s), vec![vec![1, 10, 4], vec![5]]);
        assert!(!s.set_capacity(3));
        assert_invariants(&s);
    }

    fn discovered(id: u64, name: &str) -> DiscoveredApp {
        DiscoveredApp {
            name: name.into(),
            icon: "new-icon".into(),
            path: format!("/apps/{id}.desktop").into(),
        }
    }

    #[test]
    fn sync_keeps_arrangement_and_refreshes_metadata() {
        let mut s = store(2, vec![vec![app(2), folder(10, &[1, 3])]]);
        s.sync(vec![
            discovered(1, "One"),
            discovered(2, "Two"),
            discovered(3, "Three"),
        ]);
        assert_eq!(ids(&s), vec![vec![2, 10]]);
        assert_eq!(s.app(ItemId(3)).unwrap().name, "Three");
        assert_eq!(s.app(ItemId(2)).unwrap().icon, "new-icon");
    }

    #[test]
    fn sync_removes_vanished_apps_and_dissolves_folders() {
        let mut s = store(3, vec![vec![app(1), folder(10, &[2, 3]), app(4)]]);
        s.sync(vec![discovered(1, "One"), discovered(2, "Two")]);
        assert_eq!(ids(&s), vec![vec![1, 2]]);
        assert_invariants(&s);
    }

    #[test]
    fn sync_appends_new_apps_and_cascades() {
        let mut s = store(2, vec![vec![app(1), app(2)]]);
        s.sync(vec![
            discovered(5, "Five"),
            discovered(1, "One"),
            discovered(2, "Two"),
            discovered(6, "Six"),
        ]);
        let names: Vec<&str> = s.all_apps().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Five", "Six"]);
        assert_eq!(s.page_count(), 2);
        assert!(s.app(ItemId(1000)).is_some(), "new apps get fresh ids");
        assert_invariants(&s);
    }

    #[test]
    fn sync_into_empty_store_paginates() {
        let mut s = PageStore::new(2);
        s.sync((1..=5).map(|n| discovered(n, "x")).collect());
        assert_eq!(ids(&s), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert_invariants(&s);
    }

    /// Operations the property test applies in sequence.  Folder operations
    /// pick their folder by index into the folders currently on the grid.
    #[derive(Debug, Clone)]
    enum Op {
        Append(usize),
        Take(u64),
        Move(u64, u64),
        MoveToEnd(u64, usize),
        CreateFolder(u64, u64),
        InsertIntoFolder(usize, u64, Option<u64>),
        ReorderInFolder(usize, u64, u64),
        ExtractFromFolder(usize, u64),
        RemoveFromFolder(usize, u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        let id = || 1u64..40;
        prop_oneof![
            (0usize..6).prop_map(Op::Append),
            id().prop_map(Op::Take),
            (id(), id()).prop_map(|(a, b)| Op::Move(a, b)),
            (id(), 0usize..6).prop_map(|(a, p)| Op::MoveToEnd(a, p)),
            (id(), id()).prop_map(|(a, b)| Op::CreateFolder(a, b)),
            (0usize..4, id(), proptest::option::of(id()))
                .prop_map(|(f, a, t)| Op::InsertIntoFolder(f, a, t)),
            (0usize..4, id(), id()).prop_map(|(f, a, b)| Op::ReorderInFolder(f, a, b)),
            (0usize..4, id()).prop_map(|(f, a)| Op::ExtractFromFolder(f, a)),
            (0usize..4, id()).prop_map(|(f, a)| Op::RemoveFromFolder(f, a)),
        ]
    }

    /// The `n`-th folder on the grid, wrapping; a raw id when there is none.
    fn nth_folder(store: &PageStore, n: usize) -> ItemId {
        let folders: Vec<ItemId> = store
            .pages()
            .iter()
            .flatten()
            .filter(|item| item.is_folder())
            .map(|item| item.id())
            .collect();
        if folders.is_empty() {
            ItemId(n as u64 + 1)
        } else {
            folders[n % folders.len()]
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_after_any_sequence(
            count in 0u64..20,
            capacity in 1usize..6,
            ops in proptest::collection::vec(op(), 0..40),
        ) {
            let mut s = PageStore::from_items((1..=count).map(app).collect(), capacity);
            for op in ops {
                let snapshot = s.pages().to_vec();
                let before: Vec<u64> = s.pages().iter().flatten().map(|i| i.id().0).collect();
                let result = match op {
                    Op::Append(page) => {
                        let id = s.allocate_id();
                        let result = s.append_to_page(page, app(id.0));
                        if result.is_ok() {
                            // Global order of the other items is untouched.
                            let after: Vec<u64> = s
                                .pages()
                                .iter()
                                .flatten()
                                .map(|i| i.id().0)
                                .filter(|i| *i != id.0)
                                .collect();
                            prop_assert_eq!(&after, &before);
                        }
                        result
                    }
                    Op::Take(id) => s.take(ItemId(id)).map(drop),
                    Op::Move(a, b) => s.move_item(ItemId(a), ItemId(b)),
                    Op::MoveToEnd(a, p) => s.move_to_page_end(ItemId(a), p),
                    Op::CreateFolder(a, b) => s.create_folder(ItemId(a), ItemId(b)).map(drop),
                    Op::InsertIntoFolder(f, a, t) => {
                        let f = nth_folder(&s, f);
                        s.insert_into_folder(f, ItemId(a), t.map(ItemId))
                    }
                    Op::ReorderInFolder(f, a, b) => {
                        let f = nth_folder(&s, f);
                        s.reorder_in_folder(f, ItemId(a), ItemId(b))
                    }
                    Op::ExtractFromFolder(f, a) => {
                        let f = nth_folder(&s, f);
                        s.extract_from_folder(f, ItemId(a)).map(drop)
                    }
                    Op::RemoveFromFolder(f, a) => {
                        let f = nth_folder(&s, f);
                        s.remove_from_folder(f, ItemId(a)).map(drop)
                    }
                };
                if result.is_err() {
                    prop_assert_eq!(s.pages(), &snapshot[..]);
                }
                assert_invariants(&s);
            }
        }
    }
}
