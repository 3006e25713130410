//! Line-oriented parser for `.cfg` text.
//!
//! ```text
//! [General]
//! # Max players allowed
//! MaxPlayers = 4
//! ```
//!
//! Rules, applied to each trimmed line in order:
//!
//! - blank line: drops any pending description
//! - `# text`: appends `text` to the pending description (newline-joined)
//! - `[name]`: selects section `name` and drops the pending description
//! - `key = value`: split at the first `=`; stored in the current section
//!   with the pending description attached
//!
//! Anything else, and any `key = value` line before the first section
//! header, is skipped without error so hand-edited files stay loadable.

use tracing::trace;

use crate::document::sections::Sections;

/// Parses configuration text into sections.  Never fails.
pub fn parse(text: &str) -> Sections {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut sections = Sections::new();
    let mut current: Option<String> = None;
    let mut pending: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_no = index + 1;

        if line.is_empty() {
            pending = None;
            continue;
        }

        if line.starts_with('#') {
            let comment = line.trim_start_matches(|c: char| c == '#' || c == ' ').trim();
            pending = Some(match pending.take() {
                Some(prev) => format!("{prev}\n{comment}"),
                None => comment.to_string(),
            });
            continue;
        }

        if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
            current = Some(line[1..line.len() - 1].trim().to_string());
            pending = None;
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            trace!(line = line_no, "skipping line without '='");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            trace!(line = line_no, "skipping entry with empty key");
            continue;
        }
        let Some(section) = current.as_deref() else {
            trace!(line = line_no, key, "skipping entry outside any section");
            continue;
        };

        sections.set(section, key, value.trim().to_string(), pending.take(), true);
    }

    sections
}
