//! Tracing setup.
//!
//! The terminal is the display, so log lines only ever go to a file.
//! Precedence: RUST_LOG env var > config file > default "info".

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::LOG_FILE_NAME;

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    if !config.file_enabled {
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {}: {}. Logging disabled.",
            config.file_dir.display(),
            e
        );
        return None;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    let file_appender = tracing_appender::rolling::never(&config.file_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Could not install logger: {}", e);
            None
        }
    }
}

/// Filter directive scoping `level` to this crate.
fn default_filter(level: &str) -> String {
    format!("gh_status={}", level)
}
