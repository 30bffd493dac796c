//! Shell configuration.
//!
//! Settings specific to maynard live in a JSON file at
//! `$XDG_CONFIG_HOME/maynard/config.json`.  The background image is read
//! from weston's ini file instead, see [`crate::ini`].
//!
//! # Example
//!
//! ```json
//! {
//!   "favorites": ["org.gnome.Terminal.desktop", "firefox.desktop"],
//!   "mixer": { "card": "default", "elements": ["Master"] },
//!   "panel": { "crossing_delay_ms": 1000 },
//!   "clock": { "time_format": "%H:%M" }
//! }
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional, a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Desktop ids pinned to the panel, in display order.
    #[serde(default)]
    pub favorites: Vec<String>,

    #[serde(default)]
    pub mixer: MixerConfig,

    #[serde(default)]
    pub panel: PanelConfig,

    #[serde(default)]
    pub clock: ClockConfig,
}

/// Which ALSA element the volume indicator drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    pub card: String,
    /// Element names tried in order; the first one present is used.
    pub elements: Vec<String>,
    /// How long the watcher thread blocks per wait (ms).  Also bounds how
    /// long shutdown takes.
    pub poll_timeout_ms: u64,
    /// Snapshots buffered between the watcher and the main loop.
    pub channel_capacity: usize,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            card: "default".into(),
            elements: vec!["PCM".into(), "Master".into()],
            poll_timeout_ms: 1000,
            channel_capacity: 8,
        }
    }
}

impl MixerConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Delay after configure before enter/leave on the panel is honoured
    /// (ms).  The first draw produces a spurious leave.
    pub crossing_delay_ms: u64,
    /// Pixel size of the icons in the launcher grid.
    pub launcher_icon_size: i32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            crossing_delay_ms: 1000,
            launcher_icon_size: 96,
        }
    }
}

/// `strftime` formats for the clock indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Shown in the panel.
    pub time_format: String,
    /// First line of the menu section.
    pub weekday_format: String,
    /// Second line of the menu section.
    pub date_format: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_format: "%H:%M".into(),
            weekday_format: "%A".into(),
            date_format: "%e %B %Y".into(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// [`Config::load`], or the defaults.  A missing file is the normal
    /// case for a fresh install; anything else is worth a warning.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("no {}, using default config", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using default config", e);
                Self::default()
            }
        }
    }
}

/// Resolve `$XDG_CONFIG_HOME/maynard` from the process environment.
pub fn config_dir() -> PathBuf {
    config_dir_from(|key| std::env::var(key).ok())
}

/// `$XDG_CONFIG_HOME/maynard`, else `$HOME/.config/maynard`.  Empty
/// variables count as unset, like in [`crate::ini::candidate_paths`].
/// Without either, the path is relative to the working directory.
pub fn config_dir_from(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    let set = |key: &str| env(key).filter(|v| !v.is_empty());
    let base = match (set("XDG_CONFIG_HOME"), set("HOME")) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => Path::new(&home).join(".config"),
        (None, None) => PathBuf::from(".config"),
    };
    base.join("maynard")
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
