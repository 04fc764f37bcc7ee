//! **launchgrid**: a paged app-launcher grid.
//!
//! Installed applications are laid out on fixed-size pages of
//! `columns × rows` slots.  Apps can be dragged to reorder them, dropped
//! onto each other to form folders, and dragged back out of folders.
//! Whenever an operation adds an item to a full page, the surplus spills
//! forward onto the following pages (the *overflow cascade*), so no page
//! ever holds more than its capacity.
//!
//! # Architecture
//!
//! The grid engine ([`item`], [`paging`], [`pages`], [`folder`],
//! [`reorder`], [`drag`]) is pure data manipulation with no I/O.  The
//! [`launchpad::Launchpad`] orchestrator drives it from [`command::Command`]s
//! and talks to the outside world only through three traits:
//!
//! * [`traits::AppSource`]: enumerates installed apps.
//! * [`traits::AppLauncher`]: starts the app the user picked.
//! * [`traits::CommandSource`]: delivers user intent from some transport.
//!
//! Concrete implementations live in [`platform`] (`.desktop` discovery and
//! shell launching) and [`ipc`] (Unix-socket command listener).

pub mod command;
pub mod config;
pub mod drag;
pub mod folder;
pub mod ipc;
pub mod item;
pub mod launchpad;
pub mod pages;
pub mod paging;
pub mod platform;
pub mod reorder;
pub mod scroll;
pub mod search;
pub mod traits;
