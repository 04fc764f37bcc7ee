//! Entry point for the **launchgrid** daemon.
//!
//! Discovers installed apps, listens for commands on a Unix socket, and
//! writes every [`LaunchpadEvent`](launchgrid::traits::LaunchpadEvent) to
//! stdout as one line of JSON for the renderer to consume.  The process
//! exits after an app is launched or the launchpad is dismissed.

use launchgrid::command::Command;
use launchgrid::config::Config;
use launchgrid::ipc::listener::{default_socket_path, UnixSocketListener};
use launchgrid::launchpad::{Control, Launchpad};
use launchgrid::platform::desktop::DesktopEntrySource;
use launchgrid::platform::shell::ShellLauncher;
use launchgrid::traits::{AppLauncher, AppSource, CommandSource, LaunchpadEvent};
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Instant;

/// Resolve the config directory (`$XDG_CONFIG_HOME/launchgrid`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("launchgrid")
}

/// Load `$XDG_CONFIG_HOME/launchgrid/config.json`, falling back to
/// compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    if !path.exists() {
        info!("no config at {}, using defaults", path.display());
        return Config::default();
    }
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let source = DesktopEntrySource::new(&config.discovery);
    let launcher = ShellLauncher::new(&config.launch);
    let mut launchpad = Launchpad::new(source, launcher, config.layout, config.scroll);

    let (event_tx, event_rx) = mpsc::channel();
    launchpad.set_event_sink(event_tx);
    let printer = spawn_event_printer(event_rx);

    if let Err(e) = launchpad.reload() {
        error!("{}", e);
        std::process::exit(1);
    }

    let socket = default_socket_path();
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, &socket);

    run_event_loop(&mut launchpad, cmd_rx);

    // Closing the event channel lets the printer flush and finish.
    drop(launchpad);
    let _ = printer.join();
    let _ = std::fs::remove_file(&socket);
}

/// Handle commands until exit, firing drag settle timers in between.
fn run_event_loop<S: AppSource, L: AppLauncher>(
    launchpad: &mut Launchpad<S, L>,
    cmd_rx: mpsc::Receiver<Command>,
) {
    info!("launchgrid running");
    loop {
        let received = match launchpad.pending_deadline() {
            Some(deadline) => {
                cmd_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(cmd) => match launchpad.handle(cmd) {
                Ok(Control::Continue) => {}
                Ok(Control::Exit) => break,
                Err(e) => error!("command error: {}", e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("all command sources closed, exiting");
                break;
            }
        }
        launchpad.tick(Instant::now());
    }
}

fn spawn_event_printer(rx: mpsc::Receiver<LaunchpadEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stdout = std::io::stdout();
        for event in rx {
            let line = match serde_json::to_string(&event) {
                Ok(line) => line,
                Err(e) => {
                    error!("cannot encode event: {}", e);
                    continue;
                }
            };
            let mut out = stdout.lock();
            if writeln!(out, "{}", line).and_then(|_| out.flush()).is_err() {
                warn!("stdout closed, no longer publishing events");
                break;
            }
        }
    })
}

fn spawn_command_sources(tx: mpsc::Sender<Command>, socket: &Path) {
    let path = socket.to_path_buf();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
