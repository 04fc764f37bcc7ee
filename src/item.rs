//! Grid content: launchable apps and folders of apps.
//!
//! An [`Item`] occupies exactly one slot on a page.  A [`Folder`] counts as
//! one slot no matter how many apps it holds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Name given to folders created by dragging one app onto another.
pub const DEFAULT_FOLDER_NAME: &str = "Untitled Folder";

/// Process-unique identifier of an app or folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An application as reported by an [`AppSource`](crate::traits::AppSource),
/// before it has been given an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredApp {
    pub name: String,
    /// Opaque icon handle (an icon name or file path); never interpreted here.
    pub icon: String,
    pub path: PathBuf,
}

/// A launchable application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: ItemId,
    pub name: String,
    pub icon: String,
    pub path: PathBuf,
    /// Index of the page holding this app (or holding its folder).
    pub page_index: usize,
}

/// A named, ordered group of apps occupying a single grid slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: ItemId,
    pub name: String,
    pub page_index: usize,
    pub apps: Vec<AppInfo>,
}

impl Folder {
    /// Position of `id` among the folder's apps.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.apps.iter().position(|a| a.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }
}

/// One slot of grid content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    App(AppInfo),
    Folder(Folder),
}

impl Item {
    /// Build an app item from a discovery record.
    pub fn app(id: ItemId, app: DiscoveredApp) -> Self {
        Item::App(AppInfo {
            id,
            name: app.name,
            icon: app.icon,
            path: app.path,
            page_index: 0,
        })
    }

    pub fn id(&self) -> ItemId {
        match self {
            Item::App(app) => app.id,
            Item::Folder(folder) => folder.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::App(app) => &app.name,
            Item::Folder(folder) => &folder.name,
        }
    }

    pub fn page_index(&self) -> usize {
        match self {
            Item::App(app) => app.page_index,
            Item::Folder(folder) => folder.page_index,
        }
    }

    /// Rewrite the page index, including every app nested in a folder.
    pub fn set_page_index(&mut self, page: usize) {
        match self {
            Item::App(app) => app.page_index = page,
            Item::Folder(folder) => {
                folder.page_index = page;
                for app in &mut folder.apps {
                    app.page_index = page;
                }
            }
        }
    }

    pub fn as_app(&self) -> Option<&AppInfo> {
        match self {
            Item::App(app) => Some(app),
            Item::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Item::App(_) => None,
            Item::Folder(folder) => Some(folder),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }
}
