//! The orchestrator that ties the page store, drag session, and platform
//! backends together.
//!
//! [`Launchpad`] owns the [`PageStore`] and reacts to [`Command`]s by
//! mutating it, turning pages, and calling the [`AppLauncher`].  Every
//! visible change is announced to the renderer as a [`LaunchpadEvent`].
//!
//! Nothing here blocks.  Drag settle timers are driven from outside: the
//! event loop waits until [`pending_deadline`](Launchpad::pending_deadline)
//! and then calls [`tick`](Launchpad::tick).

use crate::command::Command;
use crate::config::LayoutConfig;
use crate::drag::{DragSession, DropTarget, PendingMove};
use crate::item::{Folder, Item, ItemId};
use crate::pages::{GridError, Location, PageStore};
use crate::scroll::{PageTurn, ScrollConfig, ScrollPager};
use crate::search::filter_apps;
use crate::traits::{AppLauncher, AppSource, LaunchpadEvent, LayoutSnapshot};
use log::{debug, info, warn};
use std::sync::mpsc;
use std::time::Instant;

/// Possible errors from the launchpad.
///
/// Grid edits never fail from the caller's point of view; only the
/// platform backends can.
#[derive(Debug, thiserror::Error)]
pub enum LaunchpadError {
    /// The app source could not enumerate apps.
    #[error("app discovery failed: {0}")]
    Discovery(String),
    /// The launcher could not start the app.
    #[error("launch failed: {0}")]
    Launch(String),
}

/// What the event loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// An app was launched or the launchpad was dismissed.
    Exit,
}

/// Orchestrates the paged grid.
///
/// Generic over the [`AppSource`] and [`AppLauncher`], so it is completely
/// independent of `.desktop` files or any concrete way of starting apps.
///
/// # Typical usage
///
/// ```ignore
/// let mut pad = Launchpad::new(source, launcher, config.layout, config.scroll);
/// pad.reload()?;
/// pad.handle(Command::NextPage)?;
/// ```
pub struct Launchpad<S: AppSource, L: AppLauncher> {
    source: S,
    launcher: L,
    store: PageStore,
    layout: LayoutConfig,
    current_page: usize,
    drag: DragSession,
    scroll: ScrollPager,
    open_folder: Option<ItemId>,
    query: String,
    event_tx: Option<mpsc::Sender<LaunchpadEvent>>,
}

impl<S: AppSource, L: AppLauncher> Launchpad<S, L> {
    /// Create an empty launchpad.  Call [`reload`](Self::reload) to fill it.
    pub fn new(source: S, launcher: L, layout: LayoutConfig, scroll: ScrollConfig) -> Self {
        Self {
            source,
            launcher,
            store: PageStore::new(layout.apps_per_page()),
            drag: DragSession::new(layout.drop_delay()),
            scroll: ScrollPager::new(scroll),
            layout,
            current_page: 0,
            open_folder: None,
            query: String::new(),
            event_tx: None,
        }
    }

    /// Attach the renderer's event channel.
    pub fn set_event_sink(&mut self, tx: mpsc::Sender<LaunchpadEvent>) {
        self.event_tx = Some(tx);
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn open_folder(&self) -> Option<&Folder> {
        self.store.folder(self.open_folder?)
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// When [`tick`](Self::tick) next has work to do.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.drag.deadline()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            pages: self.store.pages().to_vec(),
            current_page: self.current_page,
            columns: self.layout.columns,
            rows: self.layout.rows,
            folder_columns: self.layout.folder_columns,
            folder_rows: self.layout.folder_rows,
            icon_size: self.layout.icon_size,
        }
    }

    /// Re-run discovery and merge the result into the current arrangement.
    pub fn reload(&mut self) -> Result<(), LaunchpadError> {
        let apps = self
            .source
            .discover()
            .map_err(|e| LaunchpadError::Discovery(e.to_string()))?;
        info!("discovered {} apps", apps.len());
        self.store.sync(apps);
        if let Some(item) = self.drag.dragged() {
            if self.store.locate(item).is_none() {
                warn!("dragged item {} was uninstalled, cancelling drag", item);
                self.drag.cancel();
            }
        }
        self.after_mutation();
        Ok(())
    }

    /// Process a single [`Command`] now.
    pub fn handle(&mut self, cmd: Command) -> Result<Control, LaunchpadError> {
        self.handle_at(cmd, Instant::now())
    }

    /// Process a single [`Command`] as if it arrived at `now`.
    ///
    /// Only backend failures are returned as errors.  Commands that make no
    /// sense for the current grid (unknown ids, drops on invalid targets)
    /// are logged and ignored.
    pub fn handle_at(&mut self, cmd: Command, now: Instant) -> Result<Control, LaunchpadError> {
        match cmd {
            Command::GoToPage(page) => self.go_to_page(page),
            Command::NextPage => self.go_to_page(self.current_page.saturating_add(1)),
            Command::PreviousPage => self.go_to_page(self.current_page.saturating_sub(1)),
            Command::Scroll { dx, dy } => match self.scroll.scroll(dx, dy, now) {
                Some(PageTurn::Next) => self.go_to_page(self.current_page.saturating_add(1)),
                Some(PageTurn::Previous) => {
                    self.go_to_page(self.current_page.saturating_sub(1))
                }
                None => {}
            },

            Command::BeginDrag(id) => self.begin_drag(id),
            Command::Hover(target) => {
                self.drag.hover(target, now);
            }
            Command::LeaveTarget => self.drag.leave(),
            Command::Drop(target) => {
                if let Some(pending) = self.drag.release(target) {
                    self.commit(pending);
                }
            }
            Command::CancelDrag => self.drag.cancel(),

            Command::OpenFolder(id) => match self.store.folder(id).cloned() {
                Some(folder) => {
                    debug!("open folder {}", id);
                    self.open_folder = Some(id);
                    self.emit(LaunchpadEvent::FolderOpened(folder));
                }
                None => debug!("cannot open {}: {}", id, GridError::NotAFolder(id)),
            },
            Command::CloseFolder => self.close_folder(),
            Command::RenameFolder { id, name } => match self.store.rename_folder(id, &name) {
                Ok(()) => self.after_mutation(),
                Err(e) => debug!("rename ignored: {}", e),
            },

            Command::Search(query) => {
                self.query = query;
                self.emit_search_results();
            }
            Command::Launch(id) => return self.launch(id),
            Command::UpdateLayout(layout) => self.update_layout(layout),
            Command::Reload => self.reload()?,
            Command::Snapshot => {
                self.emit(LaunchpadEvent::Layout(self.snapshot()));
                self.emit_page_changed();
            }
            Command::Dismiss => {
                info!("dismissed");
                return Ok(Control::Exit);
            }
        }
        Ok(Control::Continue)
    }

    /// Commit any drag settle whose deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = self.drag.poll(now) {
            self.commit(pending);
        }
    }

    //  Paging

    fn go_to_page(&mut self, page: usize) {
        let target = page.min(self.last_page());
        if target != self.current_page {
            debug!("page {} -> {}", self.current_page, target);
            self.current_page = target;
            self.emit_page_changed();
        }
    }

    fn last_page(&self) -> usize {
        self.store.page_count().saturating_sub(1)
    }

    //  Drag

    fn begin_drag(&mut self, id: ItemId) {
        let on_page = self.store.item(id).is_some();
        let in_open_folder = self.open_folder().is_some_and(|f| f.contains(id));
        if on_page || in_open_folder {
            self.drag.begin(id);
        } else {
            debug!("drag of {} refused: {}", id, GridError::InvalidDragSource);
        }
    }

    fn commit(&mut self, pending: PendingMove) {
        let PendingMove { item, target } = pending;
        let result = match target {
            DropTarget::Item { id, merge } => self.drop_onto(item, id, merge),
            DropTarget::RemoveZone => self.drop_out_of_folder(item),
            DropTarget::Page(page) => self.store.move_to_page_end(item, page),
        };
        match result {
            Ok(()) => {
                info!("dropped {} on {:?}", item, target);
                self.after_mutation();
            }
            Err(GridError::InvalidDragSource) => {
                warn!("drag of {} aborted: {}", item, GridError::InvalidDragSource);
                self.drag.cancel();
            }
            Err(e) => debug!("drop of {} on {:?} ignored: {}", item, target, e),
        }
    }

    fn drop_onto(&mut self, dragged: ItemId, target: ItemId, merge: bool) -> Result<(), GridError> {
        let from = self.store.locate(dragged).ok_or(GridError::InvalidDragSource)?;
        let to = self.store.locate(target).ok_or(GridError::UnknownItem(target))?;
        match (from, to) {
            (
                Location::InFolder {
                    page: from_page,
                    index: from_index,
                    ..
                },
                Location::InFolder { page, index, .. },
            ) if (from_page, from_index) == (page, index) => {
                let folder = self.folder_id_at(page, index)?;
                self.store.reorder_in_folder(folder, dragged, target)
            }
            (_, Location::InFolder { page, index, .. }) => {
                let folder = self.folder_id_at(page, index)?;
                self.store.insert_into_folder(folder, dragged, Some(target))
            }
            (_, Location::OnPage { .. }) if merge => {
                if self.store.folder(target).is_some() {
                    self.store.insert_into_folder(target, dragged, None)
                } else {
                    self.store.create_folder(dragged, target).map(|_| ())
                }
            }
            (_, Location::OnPage { .. }) => self.store.move_item(dragged, target),
        }
    }

    fn drop_out_of_folder(&mut self, app: ItemId) -> Result<(), GridError> {
        let folder = self
            .open_folder()
            .filter(|f| f.contains(app))
            .map(|f| f.id)
            .ok_or(GridError::InvalidDragSource)?;
        self.store.remove_from_folder(folder, app)?;
        self.close_folder();
        Ok(())
    }

    fn folder_id_at(&self, page: usize, index: usize) -> Result<ItemId, GridError> {
        self.store
            .page(page)
            .and_then(|items| items.get(index))
            .map(Item::id)
            .ok_or(GridError::InvalidDragSource)
    }

    //  Folders, search, launch, layout

    fn close_folder(&mut self) {
        if self.open_folder.take().is_some() {
            self.emit(LaunchpadEvent::FolderClosed);
        }
    }

    fn launch(&mut self, id: ItemId) -> Result<Control, LaunchpadError> {
        let Some(app) = self.store.app(id).cloned() else {
            warn!("cannot launch {}: not an app", id);
            return Ok(Control::Continue);
        };
        self.launcher
            .launch(&app)
            .map_err(|e| LaunchpadError::Launch(e.to_string()))?;
        info!("launched {}", app.name);
        self.emit(LaunchpadEvent::Launched(app));
        Ok(Control::Exit)
    }

    fn update_layout(&mut self, layout: LayoutConfig) {
        if let Err(e) = layout.validate() {
            warn!("ignoring layout update: {}", e);
            return;
        }
        self.drag.set_delay(layout.drop_delay());
        if self.store.set_capacity(layout.apps_per_page()) {
            info!(
                "relayout to {}x{}, {} pages",
                layout.columns,
                layout.rows,
                self.store.page_count()
            );
        }
        self.layout = layout;
        self.after_mutation();
    }

    //  Events

    /// Re-sync everything derived from the store after it changed.
    fn after_mutation(&mut self) {
        if let Some(id) = self.open_folder {
            match self.store.folder(id).cloned() {
                Some(folder) => self.emit(LaunchpadEvent::FolderOpened(folder)),
                None => self.close_folder(),
            }
        }
        self.current_page = self.current_page.min(self.last_page());
        self.emit(LaunchpadEvent::Layout(self.snapshot()));
        self.emit_page_changed();
        if !self.query.trim().is_empty() {
            self.emit_search_results();
        }
    }

    fn emit_page_changed(&self) {
        self.emit(LaunchpadEvent::PageChanged {
            current: self.current_page,
            count: self.store.page_count(),
        });
    }

    fn emit_search_results(&self) {
        let results = filter_apps(&self.store, &self.query)
            .into_iter()
            .cloned()
            .collect();
        self.emit(LaunchpadEvent::SearchResults(results));
    }

    fn emit(&self, event: LaunchpadEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}
