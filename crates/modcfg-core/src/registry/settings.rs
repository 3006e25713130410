//! Registry settings, loadable from a TOML file.
//!
//! ```toml
//! base_dir = "UserData"
//! ```
//!
//! Absent fields fall back to their defaults through
//! `#[serde(default = "...")]`, so an empty or missing file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Where the registry keeps owner configuration files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrySettings {
    /// Directory holding `<owner>.cfg` files.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("UserData")
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

impl RegistrySettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads settings from `path`, returning the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for read failures other than "not found"
    /// and [`ConfigError::Settings`] for malformed TOML.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::io(path, e)),
        }
    }
}
