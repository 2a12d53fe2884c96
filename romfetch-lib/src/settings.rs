//! Settings file shared by the CLI and the process-wide boundary.
//!
//! Lives at `~/.config/romfetch/settings.toml`. Every key is optional; a
//! missing file yields the defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Canonical path to the settings file: `~/.config/romfetch/settings.toml`.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// `~/.config/romfetch`, falling back to `./romfetch`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("romfetch")
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("romfetch")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TheGamesDbSettings {
    pub api_key: Option<String>,
    /// File name → game id table for the ScummVM, Daphne and Neo Geo
    /// sources; defaults to `<cache_dir>/thegamesdb-ids.toml`.
    pub id_table: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hash cache and default MAME database location.
    pub cache_dir: PathBuf,
    /// MAME metadata database; defaults to `<cache_dir>/mame.db`.
    pub mame_db: Option<PathBuf>,
    /// Scrapes allowed to run at once.
    pub max_in_flight: usize,
    /// Base delay between retry attempts. 0 retries immediately.
    pub retry_backoff_ms: u64,
    /// How long a lookup may wait for the profile's outbound permit.
    pub permit_timeout_secs: u64,
    /// Return a placeholder record titled after the file when nothing matches.
    pub add_not_found: bool,
    /// Preferred regions, most preferred first.
    pub regions: Vec<String>,
    /// Preferred languages, most preferred first.
    pub languages: Vec<String>,
    pub thegamesdb: TheGamesDbSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            mame_db: None,
            max_in_flight: 8,
            retry_backoff_ms: 0,
            permit_timeout_secs: 60,
            add_not_found: false,
            regions: ["us", "wor", "eu", "jp", "fr", "xx"]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            languages: vec!["en".to_string()],
            thegamesdb: TheGamesDbSettings::default(),
        }
    }
}

impl Settings {
    /// Load from the canonical settings path.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&settings_path())
    }

    /// Load from `path`; a missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write to `path` atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn mame_db_path(&self) -> PathBuf {
        self.mame_db
            .clone()
            .unwrap_or_else(|| self.cache_dir.join("mame.db"))
    }

    pub fn id_table_path(&self) -> PathBuf {
        self.thegamesdb
            .id_table
            .clone()
            .unwrap_or_else(|| self.cache_dir.join("thegamesdb-ids.toml"))
    }

    /// Concurrency ceiling, never below one.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.max(1)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
