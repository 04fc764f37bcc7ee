//! Application configuration.
//!
//! The configuration is read from `$XDG_CONFIG_HOME/launchgrid/config.json`.
//! Every section and every field is optional; missing values fall back to
//! the compiled-in defaults and unknown keys are ignored.
//!
//! # Example
//!
//! ```json
//! {
//!   "layout": {
//!     "columns": 7,
//!     "rows": 5,
//!     "folder_columns": 4,
//!     "folder_rows": 3,
//!     "icon_size": 96.0,
//!     "drop_delay_ms": 500
//!   },
//!   "scroll": { "activation_threshold": 80.0, "debounce_ms": 800 },
//!   "discovery": { "extra_dirs": ["/opt/apps/share/applications"] },
//!   "launch": { "command": ["gio", "launch"] }
//! }
//! ```

use crate::platform::desktop::DiscoveryConfig;
use crate::platform::shell::LaunchConfig;
use crate::scroll::ScrollConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Grid geometry and drag timing.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Horizontal-scroll paging.
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// Where to look for `.desktop` files.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// How apps are started.
    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Grid geometry and drag timing.
///
/// `columns × rows` is the page capacity.  Changing it at runtime re-chunks
/// every page; the other fields only affect presentation and drag timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: usize,
    pub rows: usize,
    /// Grid columns inside an open folder.
    pub folder_columns: usize,
    /// Visible grid rows inside an open folder.
    pub folder_rows: usize,
    /// Icon edge length in logical pixels, passed through to the renderer.
    pub icon_size: f64,
    /// How long a drag must rest on a target before it takes effect (ms).
    pub drop_delay_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 7,
            rows: 5,
            folder_columns: 4,
            folder_rows: 3,
            icon_size: 96.0,
            drop_delay_ms: 500,
        }
    }
}

impl LayoutConfig {
    /// Page capacity.
    pub fn apps_per_page(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    pub fn drop_delay(&self) -> Duration {
        Duration::from_millis(self.drop_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("columns", self.columns),
            ("rows", self.rows),
            ("folder_columns", self.folder_columns),
            ("folder_rows", self.folder_rows),
        ] {
            if value == 0 {
                return Err(ConfigError(format!("layout.{name} must be at least 1")));
            }
        }
        if self.columns.checked_mul(self.rows).is_none() {
            return Err(ConfigError(format!(
                "layout.columns × layout.rows overflows ({} × {})",
                self.columns, self.rows
            )));
        }
        if !(self.icon_size.is_finite() && self.icon_size > 0.0) {
            return Err(ConfigError(format!(
                "layout.icon_size must be positive, got {}",
                self.icon_size
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        let threshold = self.scroll.activation_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError(format!(
                "scroll.activation_threshold must be positive, got {}",
                threshold
            )));
        }
        if self.launch.command.is_empty() {
            return Err(ConfigError("launch.command must name a program".into()));
        }
        Ok(())
    }
}

/// Error from loading, parsing or validating a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
