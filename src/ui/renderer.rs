//! Turns a [`SessionState`] into the full-screen text frame.
//!
//! `render` is pure: the same state and terminal size always produce the same
//! bytes, which keeps the screen from flickering on no-op refreshes.

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use super::helpers::{boxed, content_width};
use super::state::SessionState;
use crate::constants::{
    IGNORED_COMPONENT_ID, INCIDENT_URL_BASE, TIMESTAMP_FORMAT, WATCH_HELP_TEXT,
};
use crate::status::{ComponentStatus, Incident, SystemStatus};
use crate::terminal::TerminalSize;

/// Render the whole screen for `state` at `size`.
pub fn render(state: &SessionState, size: TerminalSize) -> String {
    let width = content_width(size.columns);
    let mut lines = vec![last_updated_line(state)];

    if let Some(err) = &state.error {
        lines.push(format!("Error: {}", err).red().to_string());
    } else if let Some(status) = &state.status {
        lines.push(String::new());
        lines.extend(boxed("System Status", &component_lines(status), width));

        // Only an incident with updates gets a box; no incidents means no box.
        if let Some(incident) = status
            .latest_incident()
            .filter(|i| !i.incident_updates.is_empty())
        {
            lines.push(String::new());
            lines.extend(boxed("Incident Updates", &incident_lines(incident, width), width));
        }
    }

    fill_screen(lines, size.rows as usize, state.watch)
}

fn last_updated_line(state: &SessionState) -> String {
    let stamp = state
        .last_update
        .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default();
    format!("Last Updated: {}", stamp)
}

/// One line per component, names aligned, status colorized.
fn component_lines(status: &SystemStatus) -> Vec<String> {
    let visible: Vec<_> = status
        .components
        .iter()
        .filter(|c| c.id != IGNORED_COMPONENT_ID)
        .collect();
    let name_width = visible.iter().map(|c| c.name.width()).max().unwrap_or(0);

    visible
        .iter()
        .map(|c| {
            let gap = " ".repeat(name_width - c.name.width());
            format!("{}{}  {}", c.name, gap, colored_status(&c.status))
        })
        .collect()
}

/// Operational → green, degraded → light yellow, partial → yellow, major → red.
fn colored_status(status: &ComponentStatus) -> String {
    let label = status.label();
    match status {
        ComponentStatus::Operational => label.green().to_string(),
        ComponentStatus::DegradedPerformance => label.yellow().to_string(),
        ComponentStatus::PartialOutage => label.dark_yellow().to_string(),
        ComponentStatus::MajorOutage => label.red().to_string(),
        ComponentStatus::Other(_) => label.to_string(),
    }
}

/// Permalink followed by every update, word-wrapped to `width`.
fn incident_lines(incident: &Incident, width: usize) -> Vec<String> {
    let mut lines = vec![format!("{}{}", INCIDENT_URL_BASE, incident.id)];
    for update in &incident.incident_updates {
        let stamp = update.created_at.to_string();
        let text = if stamp.is_empty() {
            format!("[{}] {}", update.status, update.body)
        } else {
            format!("{} [{}] {}", stamp, update.status, update.body)
        };
        lines.extend(textwrap::wrap(&text, width).into_iter().map(|l| l.into_owned()));
    }
    lines
}

/// Pad to the terminal height; watch mode keeps the last row for the help text.
fn fill_screen(mut lines: Vec<String>, rows: usize, watch: bool) -> String {
    if watch {
        let body_rows = rows.saturating_sub(1);
        if lines.len() < body_rows {
            lines.resize(body_rows, String::new());
        }
        lines.push(WATCH_HELP_TEXT.to_string());
        lines.join("\n")
    } else {
        if lines.len() < rows {
            lines.resize(rows, String::new());
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
