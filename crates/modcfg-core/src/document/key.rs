//! Qualified keys: `"Category.Name"` addressing one entry.

/// Section used when a key carries no category.
pub const DEFAULT_SECTION: &str = "General";

/// A key split into its section and entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifiedKey<'a> {
    pub section: &'a str,
    pub name: &'a str,
}

impl<'a> QualifiedKey<'a> {
    /// Splits on the first `.`; everything after it is the entry name.
    ///
    /// ```rust
    /// use modcfg_core::document::key::QualifiedKey;
    ///
    /// let key = QualifiedKey::parse("Traffic.Lights.Delay");
    /// assert_eq!(key.section, "Traffic");
    /// assert_eq!(key.name, "Lights.Delay");
    ///
    /// let bare = QualifiedKey::parse("Volume");
    /// assert_eq!(bare.section, "General");
    /// ```
    pub fn parse(key: &'a str) -> Self {
        match key.split_once('.') {
            Some((section, name)) => Self { section, name },
            None => Self {
                section: DEFAULT_SECTION,
                name: key,
            },
        }
    }
}
