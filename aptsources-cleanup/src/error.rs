//! Error types of the cleanup tool.

use apt_sources::SaveError;
use std::path::PathBuf;

/// An invalid set of URI scheme equivalence classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A scheme appears in more than one class
    Overlapping {
        /// The scheme in question
        scheme: String,
        /// The (0-based) classes it appears in
        classes: (usize, usize),
    },
}

/// An active entry whose identity can't be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizeError {
    /// The URI of an entry doesn't parse
    InvalidUri {
        /// The file declaring the entry
        file: PathBuf,
        /// The offending URI
        uri: String,
        /// Why it didn't parse
        error: url::ParseError,
    },
}

/// Fatal errors of the interactive drivers
#[derive(Debug)]
pub enum ResolveError {
    /// Duplicate detection failed
    Canonicalize(CanonicalizeError),
    /// Writing the changed source lists failed
    Save(SaveError),
    /// The operator console is broken
    Io(std::io::Error),
}

impl std::fmt::Display for RelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overlapping { scheme, classes } => write!(
                f,
                "Overlapping equivalence classes: `{}` is in class {} and class {}",
                scheme,
                classes.0 + 1,
                classes.1 + 1
            ),
        }
    }
}

impl std::fmt::Display for CanonicalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUri { file, uri, error } => {
                write!(f, "{}: invalid URI `{}`: {}", file.display(), uri, error)
            }
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonicalize(e) => e.fmt(f),
            Self::Save(e) => e.fmt(f),
            Self::Io(e) => write!(f, "Console error: {e}"),
        }
    }
}

impl std::error::Error for RelationError {}

impl std::error::Error for CanonicalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidUri { error, .. } => Some(error),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Canonicalize(e) => Some(e),
            Self::Save(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<CanonicalizeError> for ResolveError {
    fn from(e: CanonicalizeError) -> Self {
        Self::Canonicalize(e)
    }
}

impl From<SaveError> for ResolveError {
    fn from(e: SaveError) -> Self {
        Self::Save(e)
    }
}

impl From<std::io::Error> for ResolveError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_error_display() {
        let e = RelationError::Overlapping {
            scheme: "https".to_string(),
            classes: (0, 2),
        };
        assert_eq!(
            e.to_string(),
            "Overlapping equivalence classes: `https` is in class 1 and class 3"
        );
    }

    #[test]
    fn test_canonicalize_error_display() {
        let e = CanonicalizeError::InvalidUri {
            file: PathBuf::from("/etc/apt/sources.list"),
            uri: "example.com/debian".to_string(),
            error: url::ParseError::RelativeUrlWithoutBase,
        };
        assert_eq!(
            e.to_string(),
            "/etc/apt/sources.list: invalid URI `example.com/debian`: relative URL without a base"
        );

        let e = ResolveError::from(e);
        assert!(e.to_string().starts_with("/etc/apt/sources.list: invalid URI"));
    }
}
