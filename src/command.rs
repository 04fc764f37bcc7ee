//! The command vocabulary shared by every input path.
//!
//! A renderer (or a script, or a test) drives the launchpad exclusively
//! through [`Command`]s.  On the wire each command is one line of JSON in
//! serde's externally tagged form, e.g. `{"GoToPage":2}`, `"NextPage"` or
//! `{"Hover":{"Item":{"id":4,"merge":true}}}`.

use crate::config::LayoutConfig;
use crate::drag::DropTarget;
use crate::item::ItemId;
use serde::{Deserialize, Serialize};

/// Every action the launchpad can perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    //  Paging

    /// Show page `n` (clamped to the last page).
    GoToPage(usize),
    NextPage,
    PreviousPage,
    /// Raw scroll-wheel / touchpad deltas; horizontal travel turns pages.
    Scroll { dx: f64, dy: f64 },

    //  Drag and drop

    /// The user picked up an item (a page item or a member of the open folder).
    BeginDrag(ItemId),
    /// The dragged item entered a drop target.
    Hover(DropTarget),
    /// The dragged item left its drop target.
    LeaveTarget,
    /// The item was released, over a target or over nothing.
    Drop(Option<DropTarget>),
    /// The drag was aborted (e.g. the pointer left the window).
    CancelDrag,

    //  Folders

    OpenFolder(ItemId),
    CloseFolder,
    RenameFolder { id: ItemId, name: String },

    //  Everything else

    /// Update the search text.  Empty text returns to the grid.
    Search(String),
    /// Start an app and exit.
    Launch(ItemId),
    /// Apply new layout settings; a capacity change re-chunks all pages.
    UpdateLayout(LayoutConfig),
    /// Re-run app discovery and rebuild the grid.
    Reload,
    /// Re-send the current layout to the renderer.
    Snapshot,
    /// Close the launchpad without launching anything.
    Dismiss,
}
