//! # gh-status - GitHub Status in the terminal
//!
//! Polls the githubstatus.com summary API and prints component health plus
//! the latest incident timeline. With `--watch` it keeps the display current,
//! re-polling on a timer or on demand with conditional requests.

mod app;
mod config;
pub mod constants;
mod input;
mod logging;
mod status;
mod terminal;
mod ui;

use anyhow::Result;
use clap::Parser;

use config::Config;

/// gh-status - GitHub Status in the terminal
#[derive(Parser, Debug)]
#[command(name = "gh-status", version, about = "Show the current GitHub service status")]
struct Cli {
    /// Keep polling and redraw in place (press 'r' to refresh, 'q' to quit)
    #[arg(long, short = 'w')]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load();

    // Flushes buffered log lines on exit
    let _log_guard = logging::init(&config.logging);
    tracing::info!(
        watch = cli.watch,
        api_url = %config.api_url,
        "gh-status starting"
    );

    app::App::new(&config, cli.watch).run().await
}
