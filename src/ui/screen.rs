//! Pushes rendered frames to the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

/// Output surface for rendered frames.
///
/// In interactive (watch) mode every frame replaces the previous one in place
/// and a frame identical to the last one is skipped. One-shot mode just prints.
pub struct Screen<W: Write> {
    out: W,
    interactive: bool,
    last_frame: Option<String>,
}

impl Screen<io::Stdout> {
    pub fn stdout(interactive: bool) -> Self {
        Self::new(io::stdout(), interactive)
    }
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            last_frame: None,
        }
    }

    /// Show `frame`. `force` redraws even when nothing changed (after a resize).
    pub fn present(&mut self, frame: &str, force: bool) -> io::Result<()> {
        if self.interactive {
            if !force && self.last_frame.as_deref() == Some(frame) {
                return Ok(());
            }
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.last_frame = Some(frame.to_string());
        Ok(())
    }

    /// Move the shell prompt below the last frame when watch mode ends.
    pub fn leave(&mut self) -> io::Result<()> {
        if self.interactive && self.last_frame.is_some() {
            self.out.write_all(b"\n")?;
            self.out.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}
