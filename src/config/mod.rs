use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::*;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/gh-status/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// Status summary endpoint
    pub api_url: String,
    /// Seconds between polls in watch mode
    pub poll_interval_secs: u64,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Log file settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter level for this crate (overridden by RUST_LOG).
    pub level: String,
    /// Write logs to a file under `file_dir`.
    pub file_enabled: bool,
    /// Directory holding the log file.
    pub file_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file_enabled: true,
            file_dir: log_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    api_url: Option<String>,
    poll_interval_secs: Option<u64>,
    logging: Option<FileLoggingConfig>,
}

/// TOML-deserializable logging section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileLoggingConfig {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<String>,
}

impl Config {
    /// Load config from ~/.config/gh-status/config.toml, falling back to defaults
    /// for any missing fields. If the file doesn't exist, returns pure defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        let config = Config::default();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return config,
        };

        match toml::from_str::<FileConfig>(&content) {
            Ok(file_config) => config.merge(file_config),
            Err(e) => {
                eprintln!(
                    "Warning: Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                config
            }
        }
    }

    /// Merge file values over defaults.
    fn merge(mut self, file_config: FileConfig) -> Self {
        if let Some(v) = file_config.api_url {
            if !v.is_empty() {
                self.api_url = v;
            }
        }
        if let Some(v) = file_config.poll_interval_secs {
            self.poll_interval_secs = v.max(MIN_POLL_INTERVAL_SECS);
        }

        if let Some(l) = file_config.logging {
            if let Some(v) = l.level {
                if !v.is_empty() {
                    self.logging.level = v;
                }
            }
            if let Some(v) = l.file_enabled {
                self.logging.file_enabled = v;
            }
            if let Some(v) = l.file_dir {
                if !v.is_empty() {
                    self.logging.file_dir = expand_home(&v);
                }
            }
        }

        self
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}
