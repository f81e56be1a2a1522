//! Application-wide constants.
//!
//! Centralizes endpoints, timing defaults, layout limits and key bindings.

use std::path::PathBuf;

// ── Status API ────────────────────────────────────────────────────
/// Summary endpoint polled by default.
pub const DEFAULT_API_URL: &str = "https://www.githubstatus.com/api/v2/summary.json";
/// Base URL for incident permalinks.
pub const INCIDENT_URL_BASE: &str = "https://www.githubstatus.com/incidents/";
/// Product token sent in the User-Agent header.
pub const USER_AGENT_PRODUCT: &str = "gh-status";
/// Placeholder component ("Visit www.githubstatus.com for more information").
pub const IGNORED_COMPONENT_ID: &str = "0l2p9nhqnxpd";

// ── Timing ────────────────────────────────────────────────────────
/// Default interval between polls in watch mode (seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
/// Lower bound for the poll interval so the API is not hammered.
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;
/// How long the input thread waits for a keystroke before checking for shutdown (ms).
pub const INPUT_POLL_MS: i32 = 100;

// ── Layout ────────────────────────────────────────────────────────
/// Content width never drops below this, even on narrow terminals.
pub const MIN_CONTENT_WIDTH: usize = 40;
/// Columns taken by a box border plus its inner padding ("│ " + " │").
pub const BOX_CHROME_WIDTH: usize = 4;
/// Size assumed when the terminal cannot report one.
pub const FALLBACK_COLUMNS: u16 = 80;
pub const FALLBACK_ROWS: u16 = 24;
/// Bottom line in watch mode.
pub const WATCH_HELP_TEXT: &str = "Press 'r' to refresh, 'q' to quit";
/// Display format for timestamps ("2014-05-03 1:22 AM").
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %-I:%M %p";

// ── Keys ──────────────────────────────────────────────────────────
pub const REFRESH_KEYS: &[u8] = b"rR";
/// `q`, `Q` and the interrupt byte (Ctrl-C).
pub const QUIT_KEYS: &[u8] = b"qQ\x03";
/// Refresh requests the loop has not consumed yet. Extra requests are dropped.
pub const REFRESH_CHANNEL_CAPACITY: usize = 1;

// ── Logging ───────────────────────────────────────────────────────
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_FILE_NAME: &str = "gh-status.log";

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/gh-status/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("gh-status")
}

/// Returns `~/.config/gh-status/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.local/share/gh-status/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("gh-status")
}

/// Returns `~/.local/share/gh-status/logs/`.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
