#![deny(missing_docs)]
//! Finds APT source entries that resolve to the same repository and source
//! lists without a single enabled entry, then offers to disable the former and
//! remove the latter.
//!
//! Two entries are considered the same repository when type, URI, distribution
//! and component match after normalization. URI schemes can be folded into
//! equivalence classes, so that by default `http`, `https` and `ftp` mirrors of
//! one location count as one.
//!
//! # Examples
//!
//! ```rust
//! use apt_sources::SourceEntry;
//! use aptsources_cleanup::canonical::EquivalenceRelation;
//! use aptsources_cleanup::detect::find_duplicates;
//!
//! let entries = [
//!     SourceEntry::from_line("deb http://deb.debian.org/debian bookworm main", "a.list"),
//!     SourceEntry::from_line("deb https://deb.debian.org/debian/ bookworm main", "b.list"),
//! ];
//! let groups = find_duplicates(&entries, Some(&EquivalenceRelation::default())).unwrap();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].members, [0, 1]);
//! ```

pub mod canonical;
pub mod choices;
pub mod cli;
pub mod console;
pub mod detect;
pub mod error;
pub mod fileutils;
pub mod resolve;

pub use canonical::EquivalenceRelation;
pub use console::Console;
pub use error::{CanonicalizeError, RelationError, ResolveError};
pub use resolve::{handle_duplicates, handle_empty_files, ApplyMode, Status};
