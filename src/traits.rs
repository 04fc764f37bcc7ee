//! Traits that decouple the grid engine from the platform around it.
//!
//! The [`Launchpad`](crate::launchpad::Launchpad) only talks to these
//! abstractions: an [`AppSource`] tells it what is installed, an
//! [`AppLauncher`] starts the app the user picked, and any number of
//! [`CommandSource`]s feed it user intent.  Whatever renders the grid
//! listens for [`LaunchpadEvent`]s on an [`mpsc`](std::sync::mpsc) channel.

use crate::command::Command;
use crate::item::{AppInfo, DiscoveredApp, Folder};
use crate::paging::Page;
use serde::Serialize;
use std::sync::mpsc;

/// Enumerates installed applications.
///
/// Implementations return apps in the order they should first appear on
/// the grid.
pub trait AppSource {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    fn discover(&self) -> Result<Vec<DiscoveredApp>, Self::Error>;
}

/// Starts an application.
pub trait AppLauncher {
    /// The error type produced by this launcher.
    type Error: std::error::Error + Send + 'static;

    /// Launch `app`.  Must not block until the app exits.
    fn launch(&self, app: &AppInfo) -> Result<(), Self::Error>;
}

//  Events

/// Everything a renderer needs to draw the paged grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub pages: Vec<Page>,
    pub current_page: usize,
    pub columns: usize,
    pub rows: usize,
    pub folder_columns: usize,
    pub folder_rows: usize,
    pub icon_size: f64,
}

/// Events sent from the [`Launchpad`](crate::launchpad::Launchpad) to a
/// renderer over an [`mpsc`](std::sync::mpsc) channel.
///
/// The launchpad never waits on the receiver; events are dropped silently
/// when nobody is listening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LaunchpadEvent {
    /// The pages changed (load, drag commit, folder edit, relayout).
    Layout(LayoutSnapshot),
    /// The visible page changed, or the page count did.
    PageChanged { current: usize, count: usize },
    /// A folder overlay is open (or its contents changed while open).
    FolderOpened(Folder),
    FolderClosed,
    /// Results for the current search text.  Empty text yields an empty
    /// list and means "show the grid".
    SearchResults(Vec<AppInfo>),
    /// `app` was handed to the launcher; the launchpad is about to exit.
    Launched(AppInfo),
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, an in-memory
/// channel, a test harness) and forward parsed commands into the provided
/// [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
