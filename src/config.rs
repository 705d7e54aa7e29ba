// src/config.rs
//
// Shell configuration. The search path and home directory come from the
// environment once at startup; presentation and logging settings come from
// an optional `~/.fero.toml`:
//
// ```toml
// prompt = "$ "
// show_cwd = true
// clear_on_start = true
// log_level = "warn"
// log_file = "/tmp/fero.log"
// ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const SETTINGS_FILE: &str = ".fero.toml";

/// User settings loaded from `~/.fero.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prompt shown in front of the edit buffer
    pub prompt: String,
    /// Print the working directory on its own line above each prompt
    pub show_cwd: bool,
    /// Clear the screen when the session starts
    pub clear_on_start: bool,
    /// Log filter used when `FERO_LOG` is unset
    pub log_level: String,
    /// Log destination, defaults to `~/.fero/fero.log`
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            show_cwd: true,
            clear_on_start: true,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from the home directory. No home or no file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match dirs::home_dir() {
            Some(home) => Self::load_from(&home.join(SETTINGS_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".fero").join("fero.log")))
    }
}

/// Everything the completion index, dispatcher and executor need from the
/// outside world.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub search_path: Vec<PathBuf>,
    pub home: PathBuf,
    pub settings: Settings,
}

impl ShellConfig {
    pub fn new(search_path: Vec<PathBuf>, home: PathBuf) -> Self {
        Self { search_path, home, settings: Settings::default() }
    }

    /// Snapshot `PATH` and `HOME`. An unset `HOME` means `/`.
    pub fn from_env(settings: Settings) -> Self {
        let search_path = std::env::var("PATH")
            .map(|p| split_search_path(&p))
            .unwrap_or_default();
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"));
        Self { search_path, home, settings }
    }
}

/// Split a colon-separated search path. Empty segments are dropped.
pub fn split_search_path(value: &str) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
