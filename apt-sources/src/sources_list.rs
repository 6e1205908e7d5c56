//! The in-memory collection of all source entries of a system, loaded from and
//! saved to the list files they were declared in.
use crate::deb822::{self, Deb822File};
use crate::{legacy, LoadError, SaveError, SourceCollection, SourceEntry};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Default root of the APT configuration
pub const DEFAULT_ROOT: &str = "/etc/apt";
/// Name of the main list file inside the configuration root
pub const MAIN_LIST: &str = "sources.list";
/// Name of the directory of additional list files inside the configuration root
pub const PARTS_DIR: &str = "sources.list.d";

/// File format for APT source list files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Deb822 format (new style, `*.sources`)
    Deb822,
    /// Legacy format (one-line style, `*.list`)
    Legacy,
}

impl FileFormat {
    /// The format implied by the file name extension, if it is a list file at all
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("list") => Some(Self::Legacy),
            Some("sources") => Some(Self::Deb822),
            _ => None,
        }
    }
}

/// All source entries loaded from a set of list files
#[derive(Debug, Clone, Default)]
pub struct SourcesList {
    entries: Vec<SourceEntry>,
    layouts: HashMap<PathBuf, Deb822File>,
}

impl SourcesList {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the system configuration from `/etc/apt`
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_root(DEFAULT_ROOT)
    }

    /// Loads `sources.list` and the list files in `sources.list.d/` of a configuration root
    ///
    /// Files in `sources.list.d/` are read in lexicographical order like APT does.
    /// A file that can't be read is skipped with a warning; it's left alone by
    /// everything that follows.
    pub fn load_root(root: impl AsRef<Path>) -> Result<Self, LoadError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LoadError::MissingRoot(root.to_path_buf()));
        }

        let mut list = Self::new();
        let main = root.join(MAIN_LIST);
        if main.is_file() {
            list.load_lenient(&main);
        }

        let parts = root.join(PARTS_DIR);
        if parts.is_dir() {
            let entries = fs::read_dir(&parts).map_err(|error| LoadError::DirectoryRead {
                path: parts.clone(),
                error,
            })?;
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && FileFormat::of(p).is_some())
                .collect();
            paths.sort();
            for path in paths {
                list.load_lenient(&path);
            }
        }

        Ok(list)
    }

    /// Loads every list file below `dir`, recursively and in sorted order
    ///
    /// Returns the number of entries added.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, LoadError> {
        let dir = dir.as_ref();
        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| LoadError::DirectoryRead {
                path: e.path().unwrap_or(dir).to_path_buf(),
                error: e.into(),
            })?;
            if entry.file_type().is_file() && FileFormat::of(entry.path()).is_some() {
                count += self.load_lenient(entry.path());
            }
        }
        Ok(count)
    }

    fn load_lenient(&mut self, path: &Path) -> usize {
        self.load(path).unwrap_or_else(|e| {
            log::warn!("{e}");
            0
        })
    }

    /// Parses one list file and appends its entries
    ///
    /// Files without a `.sources` extension are read as one-line style lists.
    /// Returns the number of entries added.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|error| LoadError::Io {
            path: path.to_path_buf(),
            error,
        })?;

        let entries = self.parse(path, &content);
        let count = entries.len();
        log::debug!("Loaded {} entries from {}", count, path.display());
        self.entries.extend(entries);
        Ok(count)
    }

    fn parse(&mut self, path: &Path, content: &str) -> Vec<SourceEntry> {
        match FileFormat::of(path) {
            Some(FileFormat::Deb822) => {
                let (layout, entries) = deb822::parse_file(content, path);
                self.layouts.insert(path.to_path_buf(), layout);
                entries
            }
            _ => legacy::parse_file(content, path),
        }
    }

    /// Appends an entry that isn't backed by a file position
    pub fn push(&mut self, entry: SourceEntry) {
        self.entries.push(entry);
    }

    /// Get iterator over entries
    pub fn iter(&self) -> std::slice::Iter<'_, SourceEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Files with at least one entry whose `disabled` flag differs from what was loaded
    pub fn modified_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in &self.entries {
            if !entry.invalid
                && entry.disabled != entry.disabled_on_load
                && !files.contains(&entry.file)
            {
                files.push(entry.file.clone());
            }
        }
        files
    }

    fn render(&self, path: &Path) -> String {
        let entries = self.entries.iter().filter(|e| e.file == path);
        match self.layouts.get(path) {
            Some(layout) => deb822::render_file(layout, &entries.collect::<Vec<_>>()),
            None => legacy::render_file(entries),
        }
    }

    fn replace_file_entries(&mut self, path: &Path, content: &str) {
        let at = self
            .entries
            .iter()
            .position(|e| e.file == path)
            .unwrap_or(self.entries.len());
        self.entries.retain(|e| e.file != path);
        let fresh = self.parse(path, content);
        let at = at.min(self.entries.len());
        self.entries.splice(at..at, fresh);
    }
}

/// Replaces `path` with `content` via a temporary file in the same directory
fn write_atomically(path: &Path, content: &str) -> Result<(), SaveError> {
    let io_error = |error| SaveError::Io {
        path: path.to_path_buf(),
        error,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(content.as_bytes()).map_err(io_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error)?;
    }
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(path).map_err(|e| SaveError::Persist {
        path: path.to_path_buf(),
        error: e.error,
    })?;
    Ok(())
}

impl SourceCollection for SourcesList {
    fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, index: usize) -> &mut SourceEntry {
        &mut self.entries[index]
    }

    fn remove(&mut self, index: usize) -> SourceEntry {
        self.entries.remove(index)
    }

    /// Writes back every file with changed entries, each one atomically
    fn save(&mut self) -> Result<(), SaveError> {
        for path in self.modified_files() {
            let content = self.render(&path);
            write_atomically(&path, &content)?;
            log::info!("Saved {}", path.display());
            self.replace_file_entries(&path, &content);
        }
        Ok(())
    }
}
