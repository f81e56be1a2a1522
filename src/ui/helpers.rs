//! Shared rendering helpers: escape stripping, width-aware padding, boxes.

use unicode_width::UnicodeWidthStr;

use crate::constants::{BOX_CHROME_WIDTH, MIN_CONTENT_WIDTH};

/// Remove every terminal escape sequence from `s`: CSI colors, OSC
/// hyperlinks, charset selects.
pub fn strip_ansi_codes(s: &str) -> String {
    strip_ansi_escapes::strip_str(s)
}

/// Display width of `s` once escape sequences are removed.
pub fn visual_width(s: &str) -> usize {
    strip_ansi_codes(s).width()
}

/// Pad `line` with spaces until its visible width reaches `width`.
/// Lines that are already wide enough come back unchanged.
pub fn pad_line_to_width(line: &str, width: usize) -> String {
    let visible = visual_width(line);
    if visible >= width {
        return line.to_string();
    }
    format!("{}{}", line, " ".repeat(width - visible))
}

/// Width available inside a box for a terminal `columns` wide.
pub fn content_width(columns: u16) -> usize {
    (columns as usize)
        .saturating_sub(BOX_CHROME_WIDTH)
        .max(MIN_CONTENT_WIDTH)
}

/// Draw a rounded box titled `title` around `body`, each body line padded to `width`.
pub fn boxed(title: &str, body: &[String], width: usize) -> Vec<String> {
    let inner = width + 2;
    let label = format!("─ {} ", title);
    let fill = inner.saturating_sub(label.width());

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!("╭{}{}╮", label, "─".repeat(fill)));
    for line in body {
        lines.push(format!("│ {} │", pad_line_to_width(line, width)));
    }
    lines.push(format!("╰{}╯", "─".repeat(inner)));
    lines
}
