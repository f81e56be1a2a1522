//! Keyboard listener for watch mode.
//!
//! Runs on its own OS thread because reading stdin blocks. It never touches
//! session state: refresh requests go through a bounded channel and a quit key
//! cancels the shared shutdown token.

use std::io;
use std::thread;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::constants::{INPUT_POLL_MS, QUIT_KEYS, REFRESH_KEYS};
use crate::terminal::{read_byte, wait_for_input};

/// What a single keystroke means to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Refresh,
    Quit,
    Ignore,
}

/// Map a raw input byte to an action.
pub fn classify(byte: u8) -> KeyAction {
    if REFRESH_KEYS.contains(&byte) {
        KeyAction::Refresh
    } else if QUIT_KEYS.contains(&byte) {
        KeyAction::Quit
    } else {
        KeyAction::Ignore
    }
}

/// Manual refresh request sent to the event loop.
#[derive(Debug)]
pub struct RefreshRequest;

/// Start the listener thread. The thread exits on quit key, end of input,
/// a read error, or when `shutdown` is cancelled elsewhere.
pub fn spawn(
    refresh_tx: mpsc::Sender<RefreshRequest>,
    shutdown: CancellationToken,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("gh-status-input".to_string())
        .spawn(move || listen(&refresh_tx, &shutdown))
}

fn listen(refresh_tx: &mpsc::Sender<RefreshRequest>, shutdown: &CancellationToken) {
    while !shutdown.is_cancelled() {
        match wait_for_input(INPUT_POLL_MS) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "waiting for keyboard input failed");
                break;
            }
        }

        match read_byte() {
            Ok(Some(byte)) => {
                if !handle_byte(byte, refresh_tx, shutdown) {
                    break;
                }
            }
            Ok(None) => {
                tracing::debug!("stdin closed, keyboard listener stopping");
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "reading keyboard input failed");
                break;
            }
        }
    }
}

/// Act on one byte. Returns `false` when the listener should stop.
fn handle_byte(
    byte: u8,
    refresh_tx: &mpsc::Sender<RefreshRequest>,
    shutdown: &CancellationToken,
) -> bool {
    match classify(byte) {
        KeyAction::Refresh => match refresh_tx.try_send(RefreshRequest) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::debug!("refresh already queued, dropping keypress");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        },
        KeyAction::Quit => {
            tracing::info!("quit key pressed");
            shutdown.cancel();
            false
        }
        KeyAction::Ignore => true,
    }
}
