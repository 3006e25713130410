//! Error type shared by every configuration operation.
//!
//! Missing keys are deliberately absent from this taxonomy: reading an
//! absent entry yields the type's default value.  Malformed lines in a
//! configuration file are not errors either; the parser skips them.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by loading, saving, and typed value access.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicit load was requested for a path that does not exist.
    #[error("configuration file \"{}\" does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    /// The path does not carry the canonical `.cfg` extension.
    #[error("\"{}\" is not a valid configuration file (expected .cfg extension)", .path.display())]
    InvalidExtension { path: PathBuf },

    /// A stored value could not be decoded as the requested kind.
    #[error("cannot parse \"{text}\" as {kind}")]
    InvalidValueFormat { text: String, kind: String },

    /// A file system I/O error occurred while reading or writing.
    #[error("I/O error accessing configuration at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The owner name cannot be turned into a file name.
    #[error("invalid configuration owner name: {0:?}")]
    InvalidOwner(String),

    /// The registry settings file is not valid TOML.
    #[error("failed to parse registry settings TOML: {0}")]
    Settings(#[from] toml::de::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid_value(text: &str, kind: impl std::fmt::Display) -> Self {
        Self::InvalidValueFormat {
            text: text.to_string(),
            kind: kind.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
