//! Folder aggregation: merging apps into folders and dragging them back out.
//!
//! These are further [`PageStore`] operations.  A folder is never left with
//! fewer than two apps: the operation that shrinks it also dissolves it,
//! putting the last app back into the folder's page slot.

use crate::item::{AppInfo, Folder, Item, ItemId, DEFAULT_FOLDER_NAME};
use crate::pages::{GridError, Location, PageStore};
use crate::reorder::reorder;
use log::debug;

impl PageStore {
    /// Merge `dragged` into `target`, replacing `target`'s slot with a new
    /// folder holding `[target, dragged]`.
    ///
    /// `target` must be an app directly on a page; `dragged` may come from a
    /// page or from another folder.  Returns the new folder's id.
    pub fn create_folder(&mut self, dragged: ItemId, target: ItemId) -> Result<ItemId, GridError> {
        if dragged == target {
            return Err(GridError::SelfTargetDrag);
        }
        match self.locate(target).ok_or(GridError::UnknownItem(target))? {
            Location::OnPage { page, index } => {
                if self.pages[page][index].is_folder() {
                    return Err(GridError::NotAnApp(target));
                }
            }
            Location::InFolder { .. } => return Err(GridError::NotOnPage(target)),
        }
        self.require_app(dragged)?;

        let Item::App(dragged_app) = self.detach(dragged)? else {
            return Err(GridError::NotAnApp(dragged));
        };
        let Some(Location::OnPage { page, index }) = self.locate(target) else {
            return Err(GridError::InvalidDragSource);
        };
        let id = self.allocate_id();
        let slot = &mut self.pages[page][index];
        let Item::App(target_app) = slot.clone() else {
            return Err(GridError::NotAnApp(target));
        };
        *slot = Item::Folder(Folder {
            id,
            name: DEFAULT_FOLDER_NAME.to_string(),
            page_index: page,
            apps: vec![target_app, dragged_app],
        });
        self.normalize();
        debug!("created folder {} from {} and {}", id, target, dragged);
        Ok(id)
    }

    /// Put `dragged` into `folder`.
    ///
    /// A member is repositioned relative to `target`.  An outsider is taken
    /// from its current container and inserted at `target`'s position, or
    /// appended when there is no (member) target.
    pub fn insert_into_folder(
        &mut self,
        folder: ItemId,
        dragged: ItemId,
        target: Option<ItemId>,
    ) -> Result<(), GridError> {
        if dragged == folder {
            return Err(GridError::SelfTargetDrag);
        }
        let is_member = self.folder(folder).ok_or(GridError::NotAFolder(folder))?.contains(dragged);
        if is_member {
            return match target {
                Some(target) => self.reorder_in_folder(folder, dragged, target),
                None => Ok(()),
            };
        }
        self.require_app(dragged)?;

        let Item::App(mut app) = self.detach(dragged)? else {
            return Err(GridError::NotAnApp(dragged));
        };
        let Some(Location::OnPage { page, index }) = self.locate(folder) else {
            return Err(GridError::InvalidDragSource);
        };
        let Item::Folder(f) = &mut self.pages[page][index] else {
            return Err(GridError::NotAFolder(folder));
        };
        let at = target
            .and_then(|t| f.position(t))
            .unwrap_or(f.apps.len());
        app.page_index = page;
        f.apps.insert(at, app);
        self.normalize();
        debug!("inserted {} into folder {} at {}", dragged, folder, at);
        Ok(())
    }

    /// Reorder two members of `folder` with the usual drag tie-break.
    pub fn reorder_in_folder(
        &mut self,
        folder: ItemId,
        dragged: ItemId,
        target: ItemId,
    ) -> Result<(), GridError> {
        if dragged == target {
            return Err(GridError::SelfTargetDrag);
        }
        let Some(Location::OnPage { page, index }) = self.locate(folder) else {
            return Err(GridError::NotAFolder(folder));
        };
        let Item::Folder(f) = &mut self.pages[page][index] else {
            return Err(GridError::NotAFolder(folder));
        };
        let from = f.position(dragged).ok_or(GridError::InvalidDragSource)?;
        let to = f.position(target).ok_or(GridError::UnknownItem(target))?;
        reorder(&mut f.apps, from, to);
        Ok(())
    }

    /// Take `app` out of `folder`, dissolving the folder if it drops below
    /// two members.  The app is returned, not placed anywhere.
    pub fn extract_from_folder(&mut self, folder: ItemId, app: ItemId) -> Result<AppInfo, GridError> {
        let f = self.folder(folder).ok_or(GridError::NotAFolder(folder))?;
        if !f.contains(app) {
            return Err(GridError::UnknownItem(app));
        }
        let Item::App(app) = self.detach(app)? else {
            return Err(GridError::NotAnApp(app));
        };
        self.normalize();
        Ok(app)
    }

    /// Drag `app` out of `folder` onto the page the folder sits on.
    ///
    /// The app is appended to that page and the page cascades, so a full
    /// page pushes its tail forward.
    pub fn remove_from_folder(&mut self, folder: ItemId, app: ItemId) -> Result<AppInfo, GridError> {
        let page = self
            .locate(folder)
            .map(|loc| loc.page())
            .ok_or(GridError::NotAFolder(folder))?;
        let removed = self.extract_from_folder(folder, app)?;
        self.append_to_page(page, Item::App(removed))?;
        debug!("removed {} from folder {} onto page {}", app, folder, page);
        self.app(app).cloned().ok_or(GridError::InvalidDragSource)
    }

    /// Set a folder's display name.  Blank names fall back to the default.
    pub fn rename_folder(&mut self, folder: ItemId, name: &str) -> Result<(), GridError> {
        let Some(Location::OnPage { page, index }) = self.locate(folder) else {
            return Err(GridError::NotAFolder(folder));
        };
        let Item::Folder(f) = &mut self.pages[page][index] else {
            return Err(GridError::NotAFolder(folder));
        };
        let name = name.trim();
        f.name = if name.is_empty() {
            DEFAULT_FOLDER_NAME.to_string()
        } else {
            name.to_string()
        };
        Ok(())
    }

    /// Collapse the folder at `pages[page][index]` if it holds fewer than
    /// two apps.  Returns whether it was dissolved.
    pub(crate) fn dissolve_if_needed(&mut self, page: usize, index: usize) -> bool {
        let Some(Item::Folder(folder)) = self.pages.get_mut(page).and_then(|p| p.get_mut(index)) else {
            return false;
        };
        if folder.apps.len() >= 2 {
            return false;
        }
        let id = folder.id;
        match folder.apps.pop() {
            Some(mut last) => {
                debug!("dissolving folder {} into {}", id, last.id);
                last.page_index = page;
                self.pages[page][index] = Item::App(last);
            }
            None => {
                debug!("removing empty folder {}", id);
                self.pages[page].remove(index);
            }
        }
        true
    }

    fn require_app(&self, id: ItemId) -> Result<(), GridError> {
        match self.locate(id).ok_or(GridError::UnknownItem(id))? {
            Location::OnPage { page, index } if self.pages[page][index].is_folder() => {
                Err(GridError::NotAnApp(id))
            }
            _ => Ok(()),
        }
    }
}
