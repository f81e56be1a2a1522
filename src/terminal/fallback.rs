//! Non-Unix implementation built on crossterm.

use std::io::{self, Read};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use super::TerminalMode;

/// crossterm raw mode stands in for termios.
#[derive(Default)]
pub struct RawMode {
    active: bool,
}

impl TerminalMode for RawMode {
    fn enter_noncanonical(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.active = true;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.active) {
            disable_raw_mode()?;
        }
        Ok(())
    }
}

/// No readiness polling here; the read itself blocks.
pub fn wait_for_input(_timeout_ms: i32) -> io::Result<bool> {
    Ok(true)
}

/// Read a single byte from stdin. `None` means end of input.
pub fn read_byte() -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    match io::stdin().read(&mut byte)? {
        0 => Ok(None),
        _ => Ok(Some(byte[0])),
    }
}

/// No resize signal on this platform.
pub struct ResizeEvents;

impl ResizeEvents {
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) {
        std::future::pending::<()>().await
    }
}

/// Ctrl-C.
pub struct ShutdownSignals;

impl ShutdownSignals {
    pub fn new() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await
        }
    }
}
