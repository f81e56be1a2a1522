//! Session state owned by the event loop and read by the renderer.

use chrono::{DateTime, Local};

use crate::status::{PollOutcome, SystemStatus};

/// Everything the display knows about the remote service.
///
/// Mutated only by the event loop; the renderer borrows it immutably.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Last successfully fetched snapshot. Kept on failure so stale data stays visible.
    pub status: Option<SystemStatus>,
    /// Message of the most recent failed poll; `None` once a poll succeeds or returns 304.
    pub error: Option<String>,
    /// When the snapshot was last replaced.
    pub last_update: Option<DateTime<Local>>,
    /// Continuous polling with interactive controls.
    pub watch: bool,
}

impl SessionState {
    pub fn new(watch: bool) -> Self {
        Self {
            watch,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Fold one poll result into the session.
    pub fn apply(&mut self, outcome: PollOutcome, now: DateTime<Local>) {
        match outcome {
            PollOutcome::Fresh(status) => {
                self.status = Some(status);
                self.error = None;
                self.last_update = Some(now);
            }
            PollOutcome::Unchanged => {
                self.error = None;
            }
            PollOutcome::Failure(err) => {
                self.error = Some(err.to_string());
            }
        }
    }
}
