//! Terminal platform layer.
//!
//! Everything OS-specific about the terminal lives here: switching stdin to
//! single-keystroke input and back, reading raw bytes, the terminal size, and
//! the resize / shutdown signal streams. The rest of the program only sees
//! [`TerminalMode`], [`ModeGuard`] and the plain functions re-exported below.

use std::io;

use crate::constants::{FALLBACK_COLUMNS, FALLBACK_ROWS};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::{read_byte, wait_for_input, ResizeEvents, ShutdownSignals, TermiosMode as PlatformMode};

#[cfg(not(unix))]
mod fallback;
#[cfg(not(unix))]
pub use fallback::{read_byte, wait_for_input, RawMode as PlatformMode, ResizeEvents, ShutdownSignals};

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    /// Assumed when the terminal cannot report its size.
    pub const FALLBACK: TerminalSize = TerminalSize {
        columns: FALLBACK_COLUMNS,
        rows: FALLBACK_ROWS,
    };
}

/// Current terminal size, or 80×24 if it cannot be determined.
pub fn terminal_size() -> TerminalSize {
    size_or_fallback(crossterm::terminal::size())
}

fn size_or_fallback(reported: io::Result<(u16, u16)>) -> TerminalSize {
    match reported {
        Ok((columns, rows)) if columns > 0 && rows > 0 => TerminalSize { columns, rows },
        _ => TerminalSize::FALLBACK,
    }
}

/// Input mode switch: keystrokes delivered one at a time, no echo,
/// output processing left alone.
pub trait TerminalMode {
    fn enter_noncanonical(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
}

/// Holds a terminal in non-canonical mode and restores it on drop,
/// including error returns and panics that unwind through the owner.
pub struct ModeGuard<M: TerminalMode> {
    mode: M,
}

impl<M: TerminalMode> ModeGuard<M> {
    pub fn enter(mut mode: M) -> io::Result<Self> {
        mode.enter_noncanonical()?;
        Ok(Self { mode })
    }
}

impl<M: TerminalMode> Drop for ModeGuard<M> {
    fn drop(&mut self) {
        if let Err(e) = self.mode.restore() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingMode {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_enter: bool,
    }

    impl TerminalMode for RecordingMode {
        fn enter_noncanonical(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push("enter");
            if self.fail_enter {
                return Err(io::Error::new(io::ErrorKind::Other, "not a tty"));
            }
            Ok(())
        }

        fn restore(&mut self) -> io::Result<()> {
            self.calls.borrow_mut().push("restore");
            Ok(())
        }
    }

    #[test]
    fn guard_restores_on_drop() {
        let mode = RecordingMode::default();
        let calls = mode.calls.clone();
        {
            let _guard = ModeGuard::enter(mode).unwrap();
            assert_eq!(*calls.borrow(), vec!["enter"]);
        }
        assert_eq!(*calls.borrow(), vec!["enter", "restore"]);
    }

    #[test]
    fn failed_enter_returns_error_without_restore() {
        let mode = RecordingMode {
            fail_enter: true,
            ..RecordingMode::default()
        };
        let calls = mode.calls.clone();
        assert!(ModeGuard::enter(mode).is_err());
        assert_eq!(*calls.borrow(), vec!["enter"]);
    }

    #[test]
    fn reported_size_is_used() {
        let size = size_or_fallback(Ok((120, 40)));
        assert_eq!(size, TerminalSize { columns: 120, rows: 40 });
    }

    #[test]
    fn unavailable_size_falls_back() {
        let err = io::Error::new(io::ErrorKind::Other, "no tty");
        assert_eq!(size_or_fallback(Err(err)), TerminalSize::FALLBACK);
        assert_eq!(size_or_fallback(Ok((0, 0))), TerminalSize::FALLBACK);
        assert_eq!(TerminalSize::FALLBACK, TerminalSize { columns: 80, rows: 24 });
    }
}
