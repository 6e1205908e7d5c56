//! Errors raised while reading, interpreting and writing back APT source lists.
//!
//! Problems with a single line or stanza never abort loading: they are kept as
//! [`EntryError`] values and the affected entry is marked invalid, the same way
//! APT itself keeps going past a broken line.

use std::path::PathBuf;

/// Why a single line or stanza could not be understood as a repository entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Blank line or pure comment
    NotAnEntry,
    /// Unrecognized repository type (only `deb` and `deb-src` are)
    InvalidType(String),
    /// An `[options]` block without closing bracket or with an item lacking `=`
    InvalidOptions(String),
    /// Missing repository URI - mandatory
    MissingUri,
    /// Missing distribution - mandatory
    MissingDist,
    /// A non-flat distribution without components
    MissingComponents,
    /// A flat distribution (ending in `/`) followed by components
    UnexpectedComponents,
    /// A mandatory DEB822 field is absent
    MissingField(&'static str),
    /// The stanza isn't valid DEB822 syntax
    Syntax(String),
}

impl std::fmt::Display for EntryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::NotAnEntry => f.write_str("Not a repository entry"),
            Self::InvalidType(t) => write!(f, "Invalid repository type `{t}`"),
            Self::InvalidOptions(o) => write!(f, "Invalid options `{o}`"),
            Self::MissingUri => f.write_str("Missing repository URI"),
            Self::MissingDist => f.write_str("Missing distribution"),
            Self::MissingComponents => f.write_str("Missing components"),
            Self::UnexpectedComponents => {
                f.write_str("Components not allowed after a flat repository path")
            }
            Self::MissingField(name) => write!(f, "missing field: {name}"),
            Self::Syntax(e) => write!(f, "DEB822 syntax error: {e}"),
        }
    }
}

/// Errors that can occur when loading source lists
#[derive(Debug)]
pub enum LoadError {
    /// The configuration root (normally `/etc/apt`) does not exist
    MissingRoot(PathBuf),
    /// Failed to read a file
    Io {
        /// The path that failed to be read
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },
    /// Failed to read directory entries
    DirectoryRead {
        /// The directory path that failed to be read
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },
}

/// Errors that can occur when writing source lists back to disk
#[derive(Debug)]
pub enum SaveError {
    /// Failed to create or write the replacement file
    Io {
        /// The list file being written
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },
    /// Failed to move the replacement file into place
    Persist {
        /// The list file being written
        path: PathBuf,
        /// The underlying I/O error
        error: std::io::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::MissingRoot(path) => {
                write!(f, "No APT configuration found at {}", path.display())
            }
            Self::Io { path, error } => write!(f, "Failed to read {}: {}", path.display(), error),
            Self::DirectoryRead { path, error } => {
                write!(f, "Failed to read directory {}: {}", path.display(), error)
            }
        }
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Io { path, error } => write!(f, "Failed to write {}: {}", path.display(), error),
            Self::Persist { path, error } => {
                write!(f, "Failed to replace {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for EntryError {}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingRoot(_) => None,
            Self::Io { error, .. } | Self::DirectoryRead { error, .. } => Some(error),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { error, .. } | Self::Persist { error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_error_display() {
        assert_eq!(
            EntryError::InvalidType("rpm".to_string()).to_string(),
            "Invalid repository type `rpm`"
        );
        assert_eq!(EntryError::MissingUri.to_string(), "Missing repository URI");
        assert_eq!(
            EntryError::MissingField("Suites").to_string(),
            "missing field: Suites"
        );
    }

    #[test]
    fn test_load_error_display() {
        let load_err = LoadError::MissingRoot(PathBuf::from("/test/apt"));
        assert_eq!(load_err.to_string(), "No APT configuration found at /test/apt");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let load_err = LoadError::Io {
            path: PathBuf::from("/test/path"),
            error: io_err,
        };
        assert!(load_err.to_string().contains("Failed to read /test/path"));
        assert!(load_err.to_string().contains("file not found"));

        let dir_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let load_err = LoadError::DirectoryRead {
            path: PathBuf::from("/test/dir"),
            error: dir_err,
        };
        assert!(load_err
            .to_string()
            .contains("Failed to read directory /test/dir"));
        assert!(load_err.to_string().contains("access denied"));
    }

    #[test]
    fn test_save_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let save_err = SaveError::Persist {
            path: PathBuf::from("/etc/apt/sources.list"),
            error: io_err,
        };
        assert_eq!(
            save_err.to_string(),
            "Failed to replace /etc/apt/sources.list: read-only"
        );
    }
}
