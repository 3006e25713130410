//! Document registry: one live [`Document`] per owner.
//!
//! An *owner* is the stable logical name of whoever owns a settings file
//! (a mod, a plugin, a subsystem).  Each owner maps to
//! `<base_dir>/<owner>.cfg`.  The first [`Registry::get_or_create`] call for
//! an owner loads that file if it exists or starts an empty document bound
//! to it otherwise; every later call returns the same shared instance, so
//! independent callers see the same edits and the same dirty flag.
//!
//! # Sharing model
//!
//! Documents are handed out as [`SharedDocument`] (`Arc<Mutex<Document>>`).
//! Hold the lock for each batch of reads and writes:
//!
//! ```rust
//! use modcfg_core::Registry;
//!
//! # let dir = std::env::temp_dir().join("modcfg_registry_doc");
//! let registry = Registry::new(&dir);
//! let doc = registry.get_or_create("QoLTweaks").unwrap();
//! {
//!     let mut doc = doc.lock().unwrap();
//!     doc.set_entry("Tweaks.Traffic", &true, Some("Traffic tweaks"), false);
//!     assert!(doc.get_entry::<bool>("Tweaks.Traffic").unwrap());
//! }
//! # std::fs::remove_dir_all(&dir).ok();
//! ```
//!
//! The registry itself is an ordinary value: construct it once and pass it
//! by reference to whatever needs configuration access.

pub mod settings;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::document::Document;
use crate::error::{ConfigError, Result};
use crate::format::EXTENSION;

pub use settings::RegistrySettings;

/// A document shared between every caller of the same owner.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Maps owner names to their single live document.
#[derive(Debug)]
pub struct Registry {
    base_dir: PathBuf,
    documents: Mutex<HashMap<String, SharedDocument>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_settings(&RegistrySettings::default())
    }
}

impl Registry {
    /// Creates a registry storing files under `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            documents: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(settings: &RegistrySettings) -> Self {
        Self::new(settings.base_dir.clone())
    }

    /// The directory owner files live in.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Computes `<base_dir>/<owner>.cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOwner`] if `owner` is blank, contains a
    /// path separator, or is `.`/`..`.
    pub fn path_for(&self, owner: &str) -> Result<PathBuf> {
        validate_owner(owner)?;
        Ok(self.base_dir.join(format!("{owner}.{EXTENSION}")))
    }

    /// Returns the live document for `owner`, loading or creating it on
    /// first access.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOwner`] for unusable owner names and
    /// propagates load errors when an existing file cannot be read.
    pub fn get_or_create(&self, owner: &str) -> Result<SharedDocument> {
        // Held across the load so racing first accesses resolve to one winner.
        let mut documents = self.lock_documents();
        if let Some(document) = documents.get(owner) {
            debug!(owner, "configuration cache hit");
            return Ok(Arc::clone(document));
        }

        let path = self.path_for(owner)?;
        let document = if path.exists() {
            debug!(owner, path = %path.display(), "loading configuration");
            Document::load(&path)?
        } else {
            debug!(owner, path = %path.display(), "creating empty configuration");
            Document::new(path)
        };

        let shared = Arc::new(Mutex::new(document));
        documents.insert(owner.to_string(), Arc::clone(&shared));
        Ok(shared)
    }

    /// Owners with a cached document, sorted by name.
    pub fn owners(&self) -> Vec<String> {
        let mut owners: Vec<String> = self.lock_documents().keys().cloned().collect();
        owners.sort();
        owners
    }

    /// Saves every cached document that is modified, or all of them when
    /// `force` is set.  Returns how many files were written.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first save failure.
    pub fn save_all(&self, force: bool) -> Result<usize> {
        let documents: Vec<SharedDocument> = self.lock_documents().values().cloned().collect();
        let mut written = 0;
        for document in documents {
            let mut document = document.lock().unwrap_or_else(PoisonError::into_inner);
            if document.save(force)? {
                written += 1;
            }
        }
        debug!(written, "saved registry documents");
        Ok(written)
    }

    fn lock_documents(&self) -> MutexGuard<'_, HashMap<String, SharedDocument>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_owner(owner: &str) -> Result<()> {
    let invalid = owner.trim().is_empty()
        || owner == "."
        || owner == ".."
        || owner.chars().any(|c| c == '/' || c == '\\');
    if invalid {
        return Err(ConfigError::InvalidOwner(owner.to_string()));
    }
    Ok(())
}
