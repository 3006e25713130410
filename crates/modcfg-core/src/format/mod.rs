//! On-disk `.cfg` format: parsing, writing, and whole-file I/O.

pub mod parser;
pub mod writer;

use std::path::Path;

use tracing::debug;

use crate::document::sections::Sections;
use crate::error::{ConfigError, Result};

pub use parser::parse;
pub use writer::write;

/// The canonical configuration file extension (without the dot).
pub const EXTENSION: &str = "cfg";

/// Returns true if `path` ends in `.cfg` (any case).
pub fn has_config_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION))
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// - [`ConfigError::FileNotFound`] if `path` does not exist.
/// - [`ConfigError::InvalidExtension`] if `path` is not a `.cfg` file.
/// - [`ConfigError::Io`] if the file cannot be read as UTF-8 text.
pub fn read_file(path: &Path) -> Result<Sections> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !has_config_extension(path) {
        return Err(ConfigError::InvalidExtension {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    let sections = parse(&text);
    debug!(path = %path.display(), sections = sections.len(), "parsed configuration file");
    Ok(sections)
}

/// Overwrites `path` with the rendered `sections` (UTF-8, no BOM).
///
/// Missing parent directories are created first.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for any file-system failure.
pub fn write_file(path: &Path, sections: &Sections) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::io(dir, source))?;
    }

    std::fs::write(path, write(sections)).map_err(|source| ConfigError::io(path, source))?;
    debug!(path = %path.display(), sections = sections.len(), "wrote configuration file");
    Ok(())
}
