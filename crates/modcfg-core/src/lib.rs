//! # modcfg-core
//!
//! Persistent, human-editable configuration documents.
//!
//! Each owner (a mod, plugin, or subsystem) gets one `.cfg` file of
//! sections and `key = value` entries, with `#` comment lines kept as entry
//! descriptions:
//!
//! ```text
//! [Traffic]
//! # percent reduction
//! SpeedReduction = 20
//! ```
//!
//! The library never installs a `tracing` subscriber; the host application
//! decides where log output goes.
//!
//! # Architecture overview (for beginners)
//!
//! A configuration *document* is a two-level table: section names map to
//! entries, and each entry holds a value as text plus an optional
//! description.  Callers never deal with that text directly.  They write a
//! typed value (`&4`, `&true`, a date, an enum, any serde struct wrapped in
//! `Json`) and the codec turns it into its canonical string; reading asks
//! for a type and the codec parses the string back.  Names are compared
//! case-insensitively, and the file keeps the order in which entries were
//! first added, so saving the same document twice gives the same bytes.
//!
//! A document remembers what it looked like when it was last loaded or
//! saved.  `save(false)` only touches the disk if the content has changed
//! since then, which makes "register defaults, then save" cheap to call on
//! every start-up.
//!
//! The crate is layered leaf-first:
//!
//! - **`codec`** – converts typed values (integers, floats, booleans, enums,
//!   dates, durations, JSON-able structs) to and from canonical text.
//! - **`format`** – parses `.cfg` text into sections and writes it back in
//!   insertion order.
//! - **`document`** – the in-memory [`Document`]: typed `set_entry` /
//!   `get_entry` access by `"Section.Name"` keys, and dirty tracking against
//!   a snapshot of the last load or save.
//! - **`registry`** – the [`Registry`] hands out exactly one shared document
//!   per owner, loading `<base_dir>/<owner>.cfg` lazily.
//!
//! ```rust
//! use modcfg_core::Document;
//!
//! let mut doc = Document::new("UserData/Example.cfg");
//! doc.set_entry("General.MaxPlayers", &4, Some("Max players allowed"), false);
//! assert_eq!(doc.get_entry::<i32>("General.MaxPlayers").unwrap(), 4);
//! assert!(doc.is_modified());
//! ```

// Each module lives in a directory of the same name (e.g. src/codec/mod.rs),
// except `error`, which is a single file.
pub mod codec;
pub mod document;
pub mod error;
pub mod format;
pub mod registry;

// Re-export the everyday types at the crate root so callers can write
// `modcfg_core::Document` instead of `modcfg_core::document::Document`.
pub use codec::{DecodeValue, EncodeValue, Json, Value, ValueKind};
pub use document::sections::{Entries, Entry, Sections};
pub use document::Document;
pub use error::{ConfigError, Result};
pub use registry::{Registry, RegistrySettings, SharedDocument};
