//! Display utilities for the bug report.

use std::path::PathBuf;

pub const HEADER_WIDTH: usize = 60;
const HEADER_FILLER: char = '+';

/// Center `text` in a line of `+` characters.
///
/// An empty title renders a solid bar.
pub fn header(text: &str) -> String {
    let padded = if text.is_empty() {
        String::new()
    } else {
        format!(" {text} ")
    };

    let len = padded.chars().count();
    if len >= HEADER_WIDTH {
        return padded;
    }

    let fill = HEADER_WIDTH - len;
    let left = fill / 2;
    let right = fill - left;
    format!(
        "{}{padded}{}",
        HEADER_FILLER.to_string().repeat(left),
        HEADER_FILLER.to_string().repeat(right)
    )
}

/// Render the matches of one search section.
pub fn section_body(matches: &[PathBuf], unreadable: usize) -> String {
    let mut out = String::new();
    for path in matches {
        out.push_str(&format!("{}\n", path.display()));
    }
    if unreadable > 0 {
        out.push_str(&format!("({unreadable} entries could not be read)\n"));
    }
    out
}
