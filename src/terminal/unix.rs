//! termios-based implementation for Linux, macOS and the BSDs.

use std::io;
use std::os::fd::RawFd;

use tokio::signal::unix::{signal, Signal, SignalKind};

use super::TerminalMode;

/// Non-canonical, no-echo stdin via `tcsetattr`.
pub struct TermiosMode {
    fd: RawFd,
    saved: Option<libc::termios>,
}

impl Default for TermiosMode {
    fn default() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
            saved: None,
        }
    }
}

impl TerminalMode for TermiosMode {
    fn enter_noncanonical(&mut self) -> io::Result<()> {
        let mut termios = get_attr(self.fd)?;
        self.saved = Some(termios);

        // Input side only; OPOST and friends stay as they were.
        termios.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ECHOK | libc::ECHONL);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        set_attr(self.fd, &termios)
    }

    fn restore(&mut self) -> io::Result<()> {
        match self.saved.take() {
            Some(saved) => set_attr(self.fd, &saved),
            None => Ok(()),
        }
    }
}

fn get_attr(fd: RawFd) -> io::Result<libc::termios> {
    // SAFETY: termios is plain data; tcgetattr fully initializes it on success.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

fn set_attr(fd: RawFd, termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Wait up to `timeout_ms` for stdin to become readable.
pub fn wait_for_input(timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(ready > 0)
}

/// Read a single byte from stdin. `None` means end of input.
pub fn read_byte() -> io::Result<Option<u8>> {
    let mut byte = 0u8;
    let n = unsafe { libc::read(libc::STDIN_FILENO, (&mut byte as *mut u8).cast(), 1) };
    match n {
        1 => Ok(Some(byte)),
        0 => Ok(None),
        _ => Err(io::Error::last_os_error()),
    }
}

/// SIGWINCH notifications.
pub struct ResizeEvents {
    winch: Signal,
}

impl ResizeEvents {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            winch: signal(SignalKind::window_change())?,
        })
    }

    pub async fn recv(&mut self) {
        if self.winch.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

/// SIGINT and SIGTERM.
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl ShutdownSignals {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }
}
