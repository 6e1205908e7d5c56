#![deny(missing_docs)]
//! A library for loading, editing and saving the APT source lists of a
//! Debian-style system: `/etc/apt/sources.list` and the `*.list` (one-line
//! style) and `*.sources` (DEB822 style) files in `/etc/apt/sources.list.d/`.
//!
//! Every repository declaration becomes a [`SourceEntry`] that remembers the
//! file it came from. Entries can be disabled in memory and the affected files
//! written back with [`SourcesList::save`].
//!
//! # Examples
//!
//! ```rust
//! use apt_sources::SourceEntry;
//!
//! let entry = SourceEntry::from_line(
//!     "deb [arch=amd64] http://deb.debian.org/debian bookworm main contrib",
//!     "/etc/apt/sources.list",
//! );
//! assert!(entry.is_active());
//! assert_eq!(entry.dist, "bookworm");
//! assert_eq!(entry.comps, ["main", "contrib"]);
//! ```

use std::path::PathBuf;
use std::str::FromStr;

pub mod deb822;
pub mod error;
pub mod legacy;
pub mod sources_list;
pub mod traits;

pub use error::{EntryError, LoadError, SaveError};
pub use sources_list::SourcesList;
pub use traits::SourceCollection;

/// A representation of the repository type, by role of packages it can provide, either `Binary`
/// (indicated by `deb`) or `Source` (indicated by `deb-src`).
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum RepositoryType {
    /// Repository with binary packages, indicated as `deb`
    Binary,
    /// Repository with source packages, indicated as `deb-src`
    Source,
}

impl FromStr for RepositoryType {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deb" => Ok(RepositoryType::Binary),
            "deb-src" => Ok(RepositoryType::Source),
            _ => Err(EntryError::InvalidType(s.to_owned())),
        }
    }
}

impl std::fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepositoryType::Binary => "deb",
            RepositoryType::Source => "deb-src",
        };
        write!(f, "{s}")
    }
}

/// Where in its file an entry was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    /// Line number (0-based) of a one-line style file
    Line(usize),
    /// Stanza number (0-based) of a DEB822 file
    Stanza(usize),
    /// Constructed in memory, not backed by a file position
    Detached,
}

/// One repository declaration from an APT source list
///
/// An entry is *active* if it is neither [`invalid`](Self::invalid) nor
/// [`disabled`](Self::disabled). Only `disabled` is meant to be changed by users
/// of this crate; everything else describes what was read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    /// Repository kind token, `deb` or `deb-src`
    pub typ: String,
    /// Repository location
    pub uri: String,
    /// Distribution or suite name; ends with `/` for flat repositories
    pub dist: String,
    /// Components in declaration order, empty for flat repositories
    pub comps: Vec<String>,
    /// The entry is commented out (`#`) or has `Enabled: no`
    pub disabled: bool,
    /// The parser couldn't make sense of the line or stanza
    pub invalid: bool,
    /// The file the entry was loaded from
    pub file: PathBuf,
    /// Raw text of the declaration, for display
    pub line: String,
    pub(crate) origin: Origin,
    pub(crate) disabled_on_load: bool,
}

impl SourceEntry {
    /// Creates an enabled, valid entry that isn't tied to a position in its file
    pub fn new(
        typ: impl Into<String>,
        uri: impl Into<String>,
        dist: impl Into<String>,
        comps: impl IntoIterator<Item = impl Into<String>>,
        file: impl Into<PathBuf>,
    ) -> Self {
        let mut entry = Self {
            typ: typ.into(),
            uri: uri.into(),
            dist: dist.into(),
            comps: comps.into_iter().map(Into::into).collect(),
            disabled: false,
            invalid: false,
            file: file.into(),
            line: String::new(),
            origin: Origin::Detached,
            disabled_on_load: false,
        };
        entry.line = entry.render();
        entry
    }

    /// Parses a single one-line style declaration
    ///
    /// This never fails: text that isn't a repository declaration produces an
    /// invalid entry that still carries the raw line.
    pub fn from_line(line: &str, file: impl Into<PathBuf>) -> Self {
        legacy::parse_entry(line, file.into(), Origin::Detached)
    }

    /// Whether APT would use this entry
    pub fn is_active(&self) -> bool {
        !self.invalid && !self.disabled
    }

    /// The declaration without any leading comment markers
    pub fn body(&self) -> &str {
        self.line.trim_start_matches(|c: char| c == '#' || c.is_whitespace())
    }

    /// One-line style rendering of the parsed fields
    pub(crate) fn render(&self) -> String {
        let mut s = format!("{} {} {}", self.typ, self.uri, self.dist);
        for comp in &self.comps {
            s.push(' ');
            s.push_str(comp);
        }
        s
    }
}

impl std::fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.invalid {
            f.write_str(&self.line)
        } else if self.disabled {
            write!(f, "# {}", self.body())
        } else {
            f.write_str(self.body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!("deb".parse::<RepositoryType>(), Ok(RepositoryType::Binary));
        assert_eq!(
            "deb-src".parse::<RepositoryType>(),
            Ok(RepositoryType::Source)
        );
        assert_eq!(
            "rpm".parse::<RepositoryType>(),
            Err(EntryError::InvalidType("rpm".to_string()))
        );
    }

    #[test]
    fn test_repository_type_display() {
        assert_eq!(RepositoryType::Binary.to_string(), "deb");
        assert_eq!(RepositoryType::Source.to_string(), "deb-src");
    }

    #[test]
    fn test_new_entry() {
        let entry = SourceEntry::new(
            "deb",
            "http://example.com/debian",
            "stable",
            ["main", "contrib"],
            "/tmp/x.list",
        );
        assert!(entry.is_active());
        assert_eq!(entry.line, "deb http://example.com/debian stable main contrib");
        assert_eq!(entry.to_string(), entry.line);
    }

    #[test]
    fn test_display_of_disabled_entry() {
        let mut entry = SourceEntry::from_line(
            "deb http://example.com/debian stable main",
            "/tmp/x.list",
        );
        entry.disabled = true;
        assert!(!entry.is_active());
        assert_eq!(entry.to_string(), "# deb http://example.com/debian stable main");

        let entry = SourceEntry::from_line(
            "#deb http://example.com/debian stable main",
            "/tmp/x.list",
        );
        assert!(entry.disabled);
        assert_eq!(entry.body(), "deb http://example.com/debian stable main");
        assert_eq!(entry.to_string(), "# deb http://example.com/debian stable main");
    }

    #[test]
    fn test_display_of_invalid_entry() {
        let entry = SourceEntry::from_line("# just a comment", "/tmp/x.list");
        assert!(entry.invalid);
        assert!(!entry.is_active());
        assert_eq!(entry.to_string(), "# just a comment");
    }
}
