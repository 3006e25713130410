//! The configuration document: one `.cfg` file held in memory.
//!
//! A [`Document`] owns the live section/entry mapping plus a *clean
//! snapshot*: a deep copy taken at the last successful load or save.
//! [`Document::is_modified`] compares the two, and [`Document::save`] only
//! touches the disk when they differ (or when forced).
//!
//! # Lifecycle
//!
//! ```text
//! new(path) ──┐
//!             ├──► set_entry / remove_entry / clear  (dirty)
//! load(path) ─┘                │
//!                              ▼
//!                         save(force)  ──► clean
//!                              │
//!                          reload()    ──► clean, unsaved edits discarded
//! ```
//!
//! A `Document` is not internally synchronized.  When several threads need
//! the same document they share it behind a lock, which is what
//! [`crate::registry::Registry`] hands out.

pub mod key;
pub mod sections;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::{self, DecodeValue, EncodeValue};
use crate::error::Result;
use crate::format;

use key::QualifiedKey;
use sections::{Entry, Sections};

/// An in-memory configuration file with change tracking.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    sections: Sections,
    snapshot: Sections,
}

impl Document {
    /// Creates an empty, clean document bound to `path`.  Nothing is read or
    /// written until [`reload`](Self::reload) or [`save`](Self::save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: absolute(path.into()),
            sections: Sections::new(),
            snapshot: Sections::new(),
        }
    }

    /// Reads and parses any configuration file, e.g. another owner's
    /// settings for inspection.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::FileNotFound`](crate::ConfigError::FileNotFound) if
    ///   `path` does not exist.
    /// - [`ConfigError::InvalidExtension`](crate::ConfigError::InvalidExtension)
    ///   if `path` is not a `.cfg` file.
    /// - [`ConfigError::Io`](crate::ConfigError::Io) if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = absolute(path.as_ref().to_path_buf());
        let sections = format::read_file(&path)?;
        Ok(Self {
            path,
            snapshot: sections.clone(),
            sections,
        })
    }

    /// The file this document is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the live sections, in insertion order.
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    // ── Typed access ──────────────────────────────────────────────────────────

    /// Writes `value` under the qualified `key`.
    ///
    /// With `overwrite == false` an existing entry is left untouched.  With
    /// `overwrite == true` the value is replaced but an existing description
    /// is kept; `description` is only used when the entry had none.
    ///
    /// ```rust
    /// use modcfg_core::Document;
    ///
    /// let mut doc = Document::new("UserData/Example.cfg");
    /// doc.set_entry("Traffic.SpeedReduction", &20, Some("percent reduction"), false);
    /// doc.set_entry("Traffic.SpeedReduction", &35, None, false);
    /// assert_eq!(doc.get_entry::<i32>("Traffic.SpeedReduction").unwrap(), 20);
    ///
    /// doc.set_entry("Traffic.SpeedReduction", &35, Some("ignored"), true);
    /// assert_eq!(doc.get_entry::<i32>("Traffic.SpeedReduction").unwrap(), 35);
    /// assert_eq!(doc.description("Traffic.SpeedReduction"), Some("percent reduction"));
    /// ```
    pub fn set_entry<V: EncodeValue + ?Sized>(
        &mut self,
        key: &str,
        value: &V,
        description: Option<&str>,
        overwrite: bool,
    ) {
        let key = QualifiedKey::parse(key);
        self.sections.set(
            key.section,
            key.name,
            codec::encode(value),
            description.map(str::to_string),
            overwrite,
        );
    }

    /// Reads the entry at `key` as `T`.
    ///
    /// An absent or blank entry yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValueFormat`](crate::ConfigError::InvalidValueFormat)
    /// if the stored text does not decode as `T`.
    pub fn get_entry<T: DecodeValue + Default>(&self, key: &str) -> Result<T> {
        match self.raw_value(key) {
            Some(text) if !text.trim().is_empty() => codec::decode(text),
            _ => Ok(T::default()),
        }
    }

    /// Removes the entry at `key`, and its section if that was the last
    /// entry.  Returns whether anything was removed.
    pub fn remove_entry(&mut self, key: &str) -> bool {
        let key = QualifiedKey::parse(key);
        self.sections.remove(key.section, key.name)
    }

    pub fn contains_entry(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// The stored text for `key`, before decoding.
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|e| e.value.as_str())
    }

    pub fn description(&self, key: &str) -> Option<&str> {
        self.entry(key)?.description.as_deref()
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        let key = QualifiedKey::parse(key);
        self.sections.get(key.section, key.name)
    }

    // ── Change tracking and persistence ───────────────────────────────────────

    /// True if the live content differs from the last loaded or saved state.
    pub fn is_modified(&self) -> bool {
        self.sections.differs_from(&self.snapshot)
    }

    /// Writes the document to its path if it is modified or `force` is set.
    /// Returns whether the file was written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`](crate::ConfigError::Io) if writing fails;
    /// the document stays modified so the save can be retried.
    pub fn save(&mut self, force: bool) -> Result<bool> {
        if !force && !self.is_modified() {
            debug!(path = %self.path.display(), "configuration unchanged, skipping save");
            return Ok(false);
        }

        if let Err(e) = format::write_file(&self.path, &self.sections) {
            warn!(path = %self.path.display(), "failed to save configuration: {e}");
            return Err(e);
        }
        self.snapshot = self.sections.clone();
        Ok(true)
    }

    /// Replaces the in-memory content with the file on disk, discarding
    /// unsaved edits.  Does nothing if the file does not exist.
    ///
    /// # Errors
    ///
    /// Propagates load errors for an existing file.
    pub fn reload(&mut self) -> Result<()> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no configuration file to reload");
            return Ok(());
        }
        let sections = format::read_file(&self.path)?;
        self.snapshot = sections.clone();
        self.sections = sections;
        Ok(())
    }

    /// Removes every section and entry from the live content.  The snapshot
    /// and the file are left alone.
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
