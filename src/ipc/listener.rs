//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves one client at a time.  Every line a
//! client writes is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! One command per line, serde's externally tagged JSON:
//!
//! ```json
//! "NextPage"
//! {"GoToPage":2}
//! {"BeginDrag":4}
//! {"Hover":{"Item":{"id":7,"merge":true}}}
//! {"Drop":{"Item":{"id":7,"merge":true}}}
//! {"Search":"term"}
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] reading newline-delimited JSON commands from a Unix
/// stream socket.
///
/// When a client disconnects the listener goes back to waiting for the
/// next one.  It returns once the receiving end of the sink is gone.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `$XDG_RUNTIME_DIR/launchgrid.sock`, or under `/tmp` without a runtime dir.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var_os("XDG_RUNTIME_DIR")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    runtime.join("launchgrid.sock")
}

/// Parse one wire line.  Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, UnixSocketError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

impl UnixSocketListener {
    /// The socket file is created by [`run`](CommandSource::run).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forward every command from one client.  Returns `false` once the
    /// sink has hung up.
    fn serve(&self, stream: UnixStream, sink: &mpsc::Sender<Command>) -> bool {
        for line in BufReader::new(stream).lines() {
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    warn!("read error: {}", e);
                    break;
                }
            };
            match parse_line(&text) {
                Ok(Some(cmd)) => {
                    debug!("received {:?}", cmd);
                    if sink.send(cmd).is_err() {
                        return false;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("ignoring bad command {:?}: {}", text, e),
            }
        }
        true
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and serve clients.
    ///
    /// Blocks until the sink closes.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // A previous instance may have left its socket behind.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if !self.serve(stream, &sink) {
                        info!("launchpad gone, closing {}", self.path.display());
                        break;
                    }
                    debug!("client disconnected");
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}
