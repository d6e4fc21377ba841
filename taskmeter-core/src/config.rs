//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/taskmeter/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/taskmeter/` (~/.config/taskmeter/)
//! - Data: `$XDG_DATA_HOME/taskmeter/` (~/.local/share/taskmeter/)
//! - State/Logs: `$XDG_STATE_HOME/taskmeter/` (~/.local/state/taskmeter/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics configuration
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Default range keyword for stats views when none is given on the
    /// command line (week, month, 3months, 6months, year)
    #[serde(default = "default_range")]
    pub default_range: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_range: default_range(),
        }
    }
}

fn default_range() -> String {
    "week".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/taskmeter/config.toml` (~/.config/taskmeter/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("taskmeter").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database and session file)
    ///
    /// `$XDG_DATA_HOME/taskmeter/` (~/.local/share/taskmeter/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("taskmeter")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/taskmeter/` (~/.local/state/taskmeter/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("taskmeter")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/taskmeter/tasks.db` (~/.local/share/taskmeter/tasks.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("tasks.db")
    }

    /// Returns the login session file path
    ///
    /// `$XDG_DATA_HOME/taskmeter/session.json` (~/.local/share/taskmeter/session.json)
    pub fn session_path() -> PathBuf {
        Self::data_dir().join("session.json")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/taskmeter/taskmeter.log` (~/.local/state/taskmeter/taskmeter.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("taskmeter.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
