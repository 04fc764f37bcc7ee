//! Desktop-integration backends.
//!
//! Concrete implementations of [`AppSource`](crate::traits::AppSource) and
//! [`AppLauncher`](crate::traits::AppLauncher) for freedesktop systems.
//! The grid engine never references anything in here.

pub mod desktop;
pub mod shell;
