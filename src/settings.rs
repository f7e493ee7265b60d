// src/settings.rs
//! Config seam: a key-value settings view, re-read at each cycle start so
//! interval and keyword changes take effect without a restart.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::source::DEFAULT_FEED_URL;

const ENV_PATH: &str = "GATEWAY_WATCHER_CONFIG";
const DEFAULT_PATH: &str = "config/watcher.toml";

/// The original preferences UI exposed 60..=3600 s; that range stays
/// authoritative here.
pub const MIN_CHECK_INTERVAL_SECS: u64 = 60;
pub const MAX_CHECK_INTERVAL_SECS: u64 = 3600;
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub feed_url: String,
    pub check_interval: u64,
    /// Comma-separated; parsed via [`parse_keywords`] each cycle.
    pub track_keywords: String,
    pub fetch_timeout: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL_SECS,
            track_keywords: String::new(),
            fetch_timeout: None,
        }
    }
}

impl Settings {
    /// Poll interval clamped into the supported range.
    pub fn interval_secs(&self) -> u64 {
        self.check_interval
            .clamp(MIN_CHECK_INTERVAL_SECS, MAX_CHECK_INTERVAL_SECS)
    }

    /// Fetch timeout; defaults to the poll interval so a hung connection can
    /// never push the next cycle more than one interval late.
    pub fn fetch_timeout_secs(&self) -> u64 {
        let interval = self.interval_secs();
        self.fetch_timeout.unwrap_or(interval).clamp(1, interval)
    }

    pub fn keywords(&self) -> Vec<String> {
        parse_keywords(&self.track_keywords)
    }
}

/// Comma-separated keyword list → lowercase, trimmed, empties dropped.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Read-only settings view; re-read by the scheduler at each cycle start.
pub trait SettingsStore: Send + Sync {
    fn current(&self) -> Settings;

    /// Where the backing file lives, if any (for the open-settings command).
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

/// TOML-file-backed store. Any read or parse failure degrades to defaults.
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `$GATEWAY_WATCHER_CONFIG`, else `config/watcher.toml`.
    pub fn from_env_or_default() -> Self {
        let path = std::env::var(ENV_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATH));
        Self::new(path)
    }
}

impl SettingsStore for FileSettings {
    fn current(&self) -> Settings {
        load_settings(&self.path)
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

fn load_settings(path: &Path) -> Settings {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = ?e, "settings file unreadable; using defaults");
            return Settings::default();
        }
    };
    match toml::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = ?e, "settings file invalid; using defaults");
            Settings::default()
        }
    }
}
