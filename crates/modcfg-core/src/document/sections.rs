//! Ordered, case-insensitive section and entry storage.
//!
//! Both levels of a document (section name → entries, entry key → entry)
//! compare names case-insensitively and iterate in first-insertion order, so
//! a document written twice produces byte-identical files.  The spelling
//! used on first insertion is the one written to disk.
//!
//! Everything stored here must survive a write/parse cycle unchanged, so
//! [`Sections::set`] normalizes its input to what the line format can
//! express: no line breaks in names or values, no `=` in keys, no
//! surrounding whitespace, and description lines without a leading `#`.

use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::warn;

/// A stored value (already serialized) with an optional description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub value: String,
    pub description: Option<String>,
}

impl Entry {
    pub fn new(value: impl Into<String>, description: Option<String>) -> Self {
        Self {
            value: value.into(),
            description: non_blank(description),
        }
    }
}

fn non_blank(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

// ── NameMap ───────────────────────────────────────────────────────────────────

/// Insertion-ordered map with case-insensitive keys.
#[derive(Debug, Clone)]
pub struct NameMap<V> {
    // folded name → (first spelling, value)
    items: IndexMap<String, (String, V)>,
}

impl<V> Default for NameMap<V> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

// Simple per-character upper-casing; characters whose upper case expands to
// several characters (`ß` → `SS`) are left alone.
fn fold(name: &str) -> String {
    name.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

impl<V> NameMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.items.get(&fold(name)).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.items.get_mut(&fold(name)).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(&fold(name))
    }

    /// Inserts or replaces the value for `name`, keeping the original
    /// spelling and position of an existing key.
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        match self.items.get_mut(&fold(name)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.items.insert(fold(name), (name.to_string(), value));
                None
            }
        }
    }

    pub fn get_or_insert_with(&mut self, name: &str, make: impl FnOnce() -> V) -> &mut V {
        let (_, value) = self
            .items
            .entry(fold(name))
            .or_insert_with(|| (name.to_string(), make()));
        value
    }

    /// Removes `name`, preserving the order of the remaining keys.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.items.shift_remove(&fold(name)).map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.items.values().map(|(name, v)| (name.as_str(), v))
    }
}

/// Entries of one section.
pub type Entries = NameMap<Entry>;

// ── Normalization ─────────────────────────────────────────────────────────────

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn clean_section(name: &str) -> Cow<'_, str> {
    if name.contains(is_line_break) {
        Cow::Owned(name.replace(is_line_break, " ").trim().to_string())
    } else {
        Cow::Borrowed(name.trim())
    }
}

/// A key must stay on one line, must not contain the `=` separator, and
/// must not read as a comment or section header once written.
fn clean_key(key: &str) -> Cow<'_, str> {
    let trimmed = key.trim();
    let needs_work = trimmed.contains(|c: char| is_line_break(c) || c == '=')
        || trimmed.starts_with(['#', '[']);
    if !needs_work {
        return Cow::Borrowed(trimmed);
    }
    let mut cleaned: String = trimmed
        .chars()
        .map(|c| if is_line_break(c) || c == '=' { '_' } else { c })
        .collect();
    if cleaned.starts_with(['#', '[']) {
        cleaned.replace_range(..1, "_");
    }
    Cow::Owned(cleaned.trim().to_string())
}

fn clean_value(value: &str) -> Cow<'_, str> {
    if value.contains(is_line_break) {
        let joined = value.replace("\r\n", " ").replace(is_line_break, " ");
        Cow::Owned(joined.trim().to_string())
    } else {
        Cow::Borrowed(value.trim())
    }
}

// Mirrors the parser: each comment line loses its `#` markers and padding.
fn clean_description(description: String) -> String {
    description
        .split('\n')
        .map(|line| line.trim().trim_start_matches(['#', ' ']).trim())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// The full section → entry mapping of a document.
///
/// Sections exist only while they hold at least one entry.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    map: NameMap<Entries>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn section(&self, name: &str) -> Option<&Entries> {
        self.map.get(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Entry> {
        self.map.get(&clean_section(section))?.get(&clean_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entries)> {
        self.map.iter()
    }

    /// Writes an entry following the overwrite rule.
    ///
    /// With `overwrite`, the value is always replaced and an existing
    /// description is kept; `description` only fills an entry that has none.
    /// Without `overwrite`, nothing happens if the entry already exists.
    ///
    /// Names, value, and description are normalized first (see the module
    /// docs); any change is logged at `warn!`.  An entry whose key is empty
    /// after normalization cannot be written and is ignored.
    pub fn set(
        &mut self,
        section: &str,
        key: &str,
        value: String,
        description: Option<String>,
        overwrite: bool,
    ) {
        let section_name = clean_section(section);
        let key_name = clean_key(key);
        if section_name != section.trim() || key_name != key.trim() {
            warn!(
                section,
                key,
                normalized_section = %section_name,
                normalized_key = %key_name,
                "configuration key normalized"
            );
        }
        if key_name.is_empty() {
            warn!(section, "ignoring configuration entry with an empty key");
            return;
        }
        let cleaned = clean_value(&value).into_owned();
        if cleaned != value {
            warn!(section, key, value = %cleaned, "configuration value normalized");
        }
        let value = cleaned;
        let description = description.map(clean_description);

        let entries = self.map.get_or_insert_with(&section_name, NameMap::new);
        match entries.get_mut(&key_name) {
            Some(existing) if overwrite => {
                existing.value = value;
                if existing.description.is_none() {
                    existing.description = non_blank(description);
                }
            }
            Some(_) => {}
            None => {
                entries.insert(&key_name, Entry::new(value, description));
            }
        }
    }

    /// Removes an entry, dropping its section once empty.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let section = clean_section(section);
        let Some(entries) = self.map.get_mut(&section) else {
            return false;
        };
        let removed = entries.remove(&clean_key(key)).is_some();
        if entries.is_empty() {
            self.map.remove(&section);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// True if `other` holds different sections, entries, values, or
    /// descriptions.  Order and key spelling are not compared.
    pub fn differs_from(&self, other: &Sections) -> bool {
        if self.len() != other.len() {
            return true;
        }
        for (name, entries) in self.iter() {
            let Some(theirs) = other.section(name) else {
                return true;
            };
            if entries.len() != theirs.len() {
                return true;
            }
            for (key, entry) in entries.iter() {
                match theirs.get(key) {
                    Some(t) if t == entry => {}
                    _ => return true,
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_name_map_lookup_ignores_case() {
        let mut map = NameMap::new();
        map.insert("MaxPlayers", 4);
        assert_eq!(map.get("maxplayers"), Some(&4));
        assert!(map.contains("MAXPLAYERS"));
    }

    #[test]
    fn test_name_map_keeps_first_spelling_and_position() {
        // Arrange
        let mut map = NameMap::new();
        map.insert("Alpha", 1);
        map.insert("Beta", 2);

        // Act
        map.insert("ALPHA", 10);

        // Assert
        let items: Vec<_> = map.iter().collect();
        assert_eq!(items, vec![("Alpha", &10), ("Beta", &2)]);
    }

    #[test]
    fn test_name_map_remove_preserves_order() {
        let mut map = NameMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        map.remove("B");
        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_set_without_overwrite_keeps_first_value() {
        let mut sections = Sections::new();
        sections.set("General", "Speed", "1".into(), None, false);
        sections.set("general", "speed", "2".into(), None, false);
        assert_eq!(sections.get("General", "Speed").unwrap().value, "1");
    }

    #[test]
    fn test_set_with_overwrite_keeps_existing_description() {
        let mut sections = Sections::new();
        sections.set("General", "Speed", "1".into(), desc("original"), false);
        sections.set("General", "Speed", "2".into(), desc("replacement"), true);
        let entry = sections.get("General", "Speed").unwrap();
        assert_eq!(entry.value, "2");
        assert_eq!(entry.description.as_deref(), Some("original"));
    }

    #[test]
    fn test_set_with_overwrite_fills_missing_description() {
        let mut sections = Sections::new();
        sections.set("General", "Speed", "1".into(), None, false);
        sections.set("General", "Speed", "2".into(), desc("added"), true);
        let entry = sections.get("General", "Speed").unwrap();
        assert_eq!(entry.description.as_deref(), Some("added"));
    }

    #[test]
    fn test_blank_description_is_stored_as_none() {
        let entry = Entry::new("1", desc("   "));
        assert_eq!(entry.description, None);
    }

    #[test]
    fn test_remove_last_entry_drops_section() {
        // Arrange
        let mut sections = Sections::new();
        sections.set("Traffic", "Enabled", "true".into(), None, false);

        // Act
        let removed = sections.remove("traffic", "ENABLED");

        // Assert
        assert!(removed);
        assert!(sections.section("Traffic").is_none());
        assert!(sections.is_empty());
    }

    #[test]
    fn test_remove_missing_entry_returns_false() {
        let mut sections = Sections::new();
        sections.set("Traffic", "Enabled", "true".into(), None, false);
        assert!(!sections.remove("Traffic", "Other"));
        assert!(!sections.remove("Nope", "Enabled"));
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_clone_is_independent_of_original() {
        let mut live = Sections::new();
        live.set("A", "x", "1".into(), None, false);
        let snapshot = live.clone();

        live.set("A", "x", "2".into(), None, true);

        assert_eq!(snapshot.get("A", "x").unwrap().value, "1");
        assert!(live.differs_from(&snapshot));
    }

    #[test]
    fn test_differs_from_detects_each_kind_of_change() {
        let mut base = Sections::new();
        base.set("A", "x", "1".into(), desc("d"), false);
        base.set("B", "y", "2".into(), None, false);

        assert!(!base.differs_from(&base.clone()));

        let mut extra_section = base.clone();
        extra_section.set("C", "z", "3".into(), None, false);
        assert!(base.differs_from(&extra_section));

        let mut extra_entry = base.clone();
        extra_entry.set("A", "w", "0".into(), None, false);
        assert!(base.differs_from(&extra_entry));

        let mut renamed = Sections::new();
        renamed.set("A", "x", "1".into(), desc("d"), false);
        renamed.set("B", "q", "2".into(), None, false);
        assert!(base.differs_from(&renamed));

        let mut new_description = Sections::new();
        new_description.set("A", "x", "1".into(), desc("other"), false);
        new_description.set("B", "y", "2".into(), None, false);
        assert!(base.differs_from(&new_description));
    }

    #[test]
    fn test_differs_from_ignores_key_case_and_order() {
        let mut a = Sections::new();
        a.set("A", "x", "1".into(), None, false);
        a.set("B", "y", "2".into(), None, false);

        let mut b = Sections::new();
        b.set("b", "Y", "2".into(), None, false);
        b.set("a", "X", "1".into(), None, false);

        assert!(!a.differs_from(&b));
    }

    // ── normalization ─────────────────────────────────────────────────────────

    #[test]
    fn test_name_map_folds_non_ascii_case() {
        let mut map = NameMap::new();
        map.insert("Ärger", 1);
        assert_eq!(map.get("äRGER"), Some(&1));
        // Multi-character upper cases are not expanded.
        map.insert("straße", 2);
        assert_eq!(map.get("STRASSE"), None);
    }

    #[test]
    fn test_set_flattens_line_breaks_in_value() {
        // Arrange
        let mut sections = Sections::new();

        // Act
        sections.set("A", "note", "first\r\n[Injected]\nevil = 1".into(), None, false);

        // Assert
        assert_eq!(
            sections.get("A", "note").unwrap().value,
            "first [Injected] evil = 1"
        );
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_set_trims_value() {
        let mut sections = Sections::new();
        sections.set("A", "pad", "  padded  ".into(), None, false);
        assert_eq!(sections.get("A", "pad").unwrap().value, "padded");
    }

    #[test]
    fn test_set_replaces_separator_and_markers_in_key() {
        // Arrange
        let mut sections = Sections::new();

        // Act
        sections.set("A", "a=b", "1".into(), None, false);
        sections.set("A", "#hidden", "2".into(), None, false);
        sections.set("A", "[x", "3".into(), None, false);
        sections.set("A", "two\nlines", "4".into(), None, false);

        // Assert
        let keys: Vec<_> = sections.section("A").unwrap().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a_b", "_hidden", "_x", "two_lines"]);
        assert_eq!(sections.get("A", "a=b").unwrap().value, "1");
    }

    #[test]
    fn test_set_ignores_key_that_is_empty() {
        let mut sections = Sections::new();
        sections.set("A", "   ", "1".into(), None, false);
        assert!(sections.is_empty());
    }

    #[test]
    fn test_set_strips_comment_markers_from_description() {
        let mut sections = Sections::new();
        sections.set("A", "x", "1".into(), desc("#1 priority\n  ## second "), false);
        assert_eq!(
            sections.get("A", "x").unwrap().description.as_deref(),
            Some("1 priority\nsecond")
        );
    }

    #[test]
    fn test_set_flattens_line_breaks_in_section() {
        let mut sections = Sections::new();
        sections.set("A\n[B]", "x", "1".into(), None, false);
        assert!(sections.get("A [B]", "x").is_some());
        assert!(sections.remove("A\n[B]", "x"));
    }
}
