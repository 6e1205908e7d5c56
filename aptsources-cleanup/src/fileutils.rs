//! Showing and removing source list files.
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::console::Console;

/// The backup APT tools leave next to a list file
pub fn companion_of(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".save");
    PathBuf::from(name)
}

/// Prints the content of `path`, or `<<<empty>>>` for an empty file
///
/// A file that can't be read is reported on the error stream.
pub fn display_file(console: &mut Console<'_>, path: &Path) -> io::Result<()> {
    match std::fs::read(path) {
        Ok(content) if content.is_empty() => writeln!(console.out(), "<<<empty>>>"),
        Ok(content) => {
            console.out().write_all(&content)?;
            if !content.ends_with(b"\n") {
                writeln!(console.out())?;
            }
            Ok(())
        }
        Err(e) => writeln!(console.err(), "Error: {}: {}", path.display(), e),
    }
}

/// What [`remove_sources_files`] managed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removal {
    /// The list file itself is gone
    pub removed: bool,
    /// Something couldn't be deleted
    pub failed: bool,
}

/// Deletes a list file and its `.save` companion
///
/// A missing companion is fine. Every other failure is reported and recorded
/// in the result; the companion is attempted even if the list file failed.
pub fn remove_sources_files(console: &mut Console<'_>, path: &Path) -> io::Result<Removal> {
    let mut removal = Removal::default();
    for (target, is_companion) in [(path.to_path_buf(), false), (companion_of(path), true)] {
        match std::fs::remove_file(&target) {
            Ok(()) => {
                info!("Removed {}", target.display());
                writeln!(console.err(), "'{}' removed.", target.display())?;
                if !is_companion {
                    removal.removed = true;
                }
            }
            Err(e) if is_companion && e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!("Failed to remove {}: {}", target.display(), e);
                writeln!(console.err(), "Error: {}: {}", target.display(), e)?;
                removal.failed = true;
            }
        }
    }
    Ok(removal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run<R>(f: impl FnOnce(&mut Console<'_>) -> R) -> (R, String, String) {
        let mut input = Cursor::new("");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut console = Console::new(&mut input, &mut out, &mut err);
        let result = f(&mut console);
        drop(console);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_companion_of() {
        assert_eq!(
            companion_of(Path::new("/etc/apt/sources.list.d/x.list")),
            PathBuf::from("/etc/apt/sources.list.d/x.list.save")
        );
    }

    #[test]
    fn test_display_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.list");

        std::fs::write(&path, "# deb http://example.com/debian stable main").unwrap();
        let (result, out, _) = run(|c| display_file(c, &path));
        result.unwrap();
        assert_eq!(out, "# deb http://example.com/debian stable main\n");

        std::fs::write(&path, "").unwrap();
        let (result, out, _) = run(|c| display_file(c, &path));
        result.unwrap();
        assert_eq!(out, "<<<empty>>>\n");

        let missing = dir.path().join("missing.list");
        let (result, out, err) = run(|c| display_file(c, &missing));
        result.unwrap();
        assert_eq!(out, "");
        assert!(err.starts_with("Error: "));
    }

    #[test]
    fn test_remove_with_companion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.list");
        std::fs::write(&path, "").unwrap();
        std::fs::write(companion_of(&path), "").unwrap();

        let (result, _, err) = run(|c| remove_sources_files(c, &path));
        assert_eq!(
            result.unwrap(),
            Removal {
                removed: true,
                failed: false,
            }
        );
        assert!(!path.exists());
        assert!(!companion_of(&path).exists());
        assert_eq!(err.lines().count(), 2);
    }

    #[test]
    fn test_remove_without_companion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.list");
        std::fs::write(&path, "").unwrap();

        let (result, _, err) = run(|c| remove_sources_files(c, &path));
        assert_eq!(
            result.unwrap(),
            Removal {
                removed: true,
                failed: false,
            }
        );
        assert_eq!(err, format!("'{}' removed.\n", path.display()));
    }

    #[test]
    fn test_remove_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.list");

        let (result, _, err) = run(|c| remove_sources_files(c, &path));
        assert_eq!(
            result.unwrap(),
            Removal {
                removed: false,
                failed: true,
            }
        );
        assert_eq!(err, format!("Error: {}: {}\n", path.display(), err_text(&path)));
    }

    fn err_text(path: &Path) -> std::io::Error {
        std::fs::remove_file(path).unwrap_err()
    }
}
