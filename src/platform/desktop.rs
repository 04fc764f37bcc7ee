//! [`AppSource`] backed by freedesktop `.desktop` files.
//!
//! Looks in `applications/` under `$XDG_DATA_HOME` (default
//! `~/.local/share`) and under every entry of `$XDG_DATA_DIRS` (default
//! `/usr/local/share:/usr/share`), then in any configured extra
//! directories.  A file in an earlier directory shadows a file with the
//! same name in a later one, so user overrides win over system entries.

use crate::item::DiscoveredApp;
use crate::traits::AppSource;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where to look for `.desktop` files beyond the XDG defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directories searched after the XDG ones, in order.
    pub extra_dirs: Vec<PathBuf>,
}

pub struct DesktopEntrySource {
    dirs: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
#[error("desktop entry error: {0}")]
pub struct DesktopEntryError(String);

impl DesktopEntrySource {
    /// Search the XDG application directories plus `config.extra_dirs`.
    pub fn new(config: &DiscoveryConfig) -> Self {
        let mut dirs = xdg_application_dirs();
        dirs.extend(config.extra_dirs.iter().cloned());
        Self::with_dirs(dirs)
    }

    /// Search exactly `dirs`, highest priority first.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl AppSource for DesktopEntrySource {
    type Error = DesktopEntryError;

    fn discover(&self) -> Result<Vec<DiscoveredApp>, DesktopEntryError> {
        let mut seen: HashSet<OsString> = HashSet::new();
        let mut apps = Vec::new();
        let mut readable = 0usize;

        for dir in &self.dirs {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            readable += 1;

            // Sorted so shadowing and duplicate handling do not depend on
            // directory iteration order.
            let mut files: BTreeMap<OsString, PathBuf> = BTreeMap::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "desktop") {
                    files.insert(entry.file_name(), path);
                }
            }

            for (file_name, path) in files {
                if !seen.insert(file_name) {
                    continue;
                }
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        if let Some(app) = parse_desktop_entry(&contents, &path) {
                            apps.push(app);
                        }
                    }
                    Err(e) => warn!("cannot read {}: {}", path.display(), e),
                }
            }
        }

        if readable == 0 && !self.dirs.is_empty() {
            return Err(DesktopEntryError(format!(
                "none of {} application directories could be read",
                self.dirs.len()
            )));
        }

        apps.sort_by_cached_key(|app| app.name.to_lowercase());
        debug!("discovered {} apps in {} directories", apps.len(), readable);
        Ok(apps)
    }
}

/// Parse the `[Desktop Entry]` group of a `.desktop` file.
///
/// Returns `None` for anything that should not appear on the grid: entries
/// that are not `Type=Application`, have no `Name`, or are marked
/// `NoDisplay=true` / `Hidden=true`.
pub fn parse_desktop_entry(contents: &str, path: &Path) -> Option<DiscoveredApp> {
    let mut in_entry = false;
    let mut name = None;
    let mut icon = None;
    let mut is_application = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        // Localized keys such as `Name[de]` are not matched.
        match (key.trim(), value.trim()) {
            ("Type", v) => is_application = v == "Application",
            ("Name", v) if !v.is_empty() => name = Some(v.to_string()),
            ("Icon", v) => icon = Some(v.to_string()),
            ("NoDisplay" | "Hidden", "true") => return None,
            _ => {}
        }
    }

    if !is_application {
        return None;
    }
    Some(DiscoveredApp {
        name: name?,
        icon: icon.unwrap_or_default(),
        path: path.to_path_buf(),
    })
}

fn xdg_application_dirs() -> Vec<PathBuf> {
    let data_home = non_empty_env("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| non_empty_env("HOME").map(|home| Path::new(&home).join(".local/share")));
    let data_dirs = non_empty_env("XDG_DATA_DIRS")
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());

    data_home
        .into_iter()
        .chain(
            data_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
        )
        .map(|dir| dir.join("applications"))
        .collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
