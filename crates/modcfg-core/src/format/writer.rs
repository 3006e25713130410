//! Renders sections back to `.cfg` text.
//!
//! Sections and entries are written in insertion order.  Each entry is
//! preceded by its description lines (`# ` prefixed) and followed by a blank
//! separator line; the result ends with exactly one `\n`.

use crate::document::sections::Sections;

/// Renders `sections` as configuration text.
pub fn write(sections: &Sections) -> String {
    let mut out = String::new();

    for (name, entries) in sections.iter() {
        if entries.is_empty() {
            continue;
        }
        out.push_str(&format!("[{name}]\n"));

        for (key, entry) in entries.iter() {
            if let Some(description) = entry.description.as_deref() {
                for line in description.split('\n') {
                    out.push_str(&format!("# {}\n", line.trim()));
                }
            }
            out.push_str(&format!("{key} = {}\n\n", entry.value));
        }
    }

    let mut text = out.trim_end().to_string();
    text.push('\n');
    text
}
