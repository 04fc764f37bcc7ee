//! Command input over a Unix socket.
//!
//! A renderer, a key-bind helper or a shell script connects to the socket
//! and writes newline-delimited JSON [`Command`](crate::command::Command)s.

pub mod listener;
