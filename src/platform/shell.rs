//! [`AppLauncher`] that hands the `.desktop` path to an external program.

use crate::item::AppInfo;
use crate::traits::AppLauncher;
use log::info;
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};

/// How apps are started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Program and leading arguments; the app's path is appended.
    /// Default: `["gio", "launch"]`.
    pub command: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            command: vec!["gio".into(), "launch".into()],
        }
    }
}

/// Spawns the configured launch command, detached from our stdio.
pub struct ShellLauncher {
    command: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("launch error: {0}")]
pub struct ShellLaunchError(String);

impl ShellLauncher {
    pub fn new(config: &LaunchConfig) -> Self {
        Self {
            command: config.command.clone(),
        }
    }
}

impl AppLauncher for ShellLauncher {
    type Error = ShellLaunchError;

    fn launch(&self, app: &AppInfo) -> Result<(), ShellLaunchError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| ShellLaunchError("no launch command configured".into()))?;

        info!("launching {} via {}", app.path.display(), program);
        Command::new(program)
            .args(args)
            .arg(&app.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ShellLaunchError(format!("spawn {}: {}", program, e)))?;
        Ok(())
    }
}
