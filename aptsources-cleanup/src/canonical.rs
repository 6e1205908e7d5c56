//! Equivalence keys identifying the repository a source entry resolves to.
//!
//! Two active entries are duplicates when they share a key. Keys are built per
//! component, so `deb http://x stable main contrib` overlaps both
//! `deb http://x stable main` and `deb https://x/ stable contrib`.
use std::str::FromStr;

use apt_sources::SourceEntry;
use url::{Position, Url};

use crate::error::{CanonicalizeError, RelationError};

/// Normalizes a slash-separated path the way POSIX `normpath` does
///
/// Repeated separators and `.` segments vanish, `..` consumes its parent and a
/// trailing separator is dropped. The empty path becomes `.`.
///
/// ```rust
/// use aptsources_cleanup::canonical::normpath;
///
/// assert_eq!(normpath("/debian/dists/../pool/"), "/debian/pool");
/// assert_eq!(normpath("stable/updates/"), "stable/updates");
/// assert_eq!(normpath("./"), ".");
/// ```
pub fn normpath(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            s => segments.push(s),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Disjoint classes of URI schemes that reach the same repository
///
/// Scheme names are stored lower-case and looked up case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceRelation {
    classes: Vec<Vec<String>>,
}

impl EquivalenceRelation {
    /// Builds a relation, rejecting a scheme that shows up in two classes
    ///
    /// Empty scheme names and empty classes are ignored.
    pub fn new<I, C, S>(classes: I) -> Result<Self, RelationError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = Self::empty();
        for class in classes {
            let mut members: Vec<String> = Vec::new();
            for scheme in class {
                let scheme = scheme.as_ref().trim().to_ascii_lowercase();
                if scheme.is_empty() || members.contains(&scheme) {
                    continue;
                }
                if let Some(other) = result.class_of(&scheme) {
                    return Err(RelationError::Overlapping {
                        scheme,
                        classes: (other, result.classes.len()),
                    });
                }
                members.push(scheme);
            }
            if !members.is_empty() {
                result.classes.push(members);
            }
        }
        Ok(result)
    }

    /// A relation that folds nothing
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Index of the class containing `scheme`
    pub fn class_of(&self, scheme: &str) -> Option<usize> {
        self.classes
            .iter()
            .position(|class| class.iter().any(|s| s.eq_ignore_ascii_case(scheme)))
    }

    /// The classes in declaration order
    pub fn classes(&self) -> &[Vec<String>] {
        &self.classes
    }

    /// Whether the relation has no classes at all
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for EquivalenceRelation {
    /// `http`, `https` and `ftp` mirrors are commonly interchangeable
    fn default() -> Self {
        Self {
            classes: vec![vec![
                "http".to_string(),
                "https".to_string(),
                "ftp".to_string(),
            ]],
        }
    }
}

impl FromStr for EquivalenceRelation {
    type Err = RelationError;

    /// Parses `;`-separated classes of `,`-separated schemes, e.g.
    /// `http,https;tor+http,tor+https`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(';').map(|class| class.split(',')))
    }
}

impl std::fmt::Display for EquivalenceRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            f.write_str(&class.join(","))?;
        }
        Ok(())
    }
}

/// The scheme part of an [`EquivalenceKey`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemeKey {
    /// Index of the equivalence class the scheme belongs to
    Class(usize),
    /// A scheme outside every class, lower-case
    Literal(String),
}

/// Identity of one (type, location, dist, component) a source entry provides
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquivalenceKey {
    /// `deb` or `deb-src`
    pub typ: String,
    /// Scheme class or literal scheme
    pub scheme: SchemeKey,
    /// The URI without its scheme, with a normalized path
    pub location: String,
    /// Normalized distribution
    pub dist: String,
    /// Normalized component, `None` for flat repositories
    pub component: Option<String>,
}

/// Computes the keys of `entry`, one per component
pub fn canonical_keys(
    entry: &SourceEntry,
    relation: Option<&EquivalenceRelation>,
) -> Result<Vec<EquivalenceKey>, CanonicalizeError> {
    let url = Url::parse(&entry.uri).map_err(|error| CanonicalizeError::InvalidUri {
        file: entry.file.clone(),
        uri: entry.uri.clone(),
        error,
    })?;

    let scheme = match relation.and_then(|r| r.class_of(url.scheme())) {
        Some(class) => SchemeKey::Class(class),
        None => SchemeKey::Literal(url.scheme().to_ascii_lowercase()),
    };
    let location = location_of(&url);
    let dist = normpath(&entry.dist);

    let key = |component: Option<String>| EquivalenceKey {
        typ: entry.typ.clone(),
        scheme: scheme.clone(),
        location: location.clone(),
        dist: dist.clone(),
        component,
    };

    if entry.comps.is_empty() {
        Ok(vec![key(None)])
    } else {
        Ok(entry.comps.iter().map(|c| key(Some(normpath(c)))).collect())
    }
}

fn location_of(url: &Url) -> String {
    let path = if url.cannot_be_a_base() {
        url.path().to_owned()
    } else {
        normpath(url.path())
    };
    format!(
        "{}{}{}",
        &url[Position::BeforeUsername..Position::AfterPort],
        path,
        &url[Position::AfterPath..]
    )
}
