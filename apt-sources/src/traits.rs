//! The interface tools editing source lists are written against, so they can run
//! on the real [`SourcesList`](crate::SourcesList) as well as on in-memory doubles.
use std::path::Path;

use crate::{SaveError, SourceEntry};

/// A mutable, ordered collection of source entries backed by list files
pub trait SourceCollection {
    /// All entries in load order
    fn entries(&self) -> &[SourceEntry];

    /// Mutable access to one entry
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    fn entry_mut(&mut self, index: usize) -> &mut SourceEntry;

    /// Drops an entry from the collection without touching any file
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    fn remove(&mut self, index: usize) -> SourceEntry;

    /// Persists changed `disabled` flags to the files the entries came from
    fn save(&mut self) -> Result<(), SaveError>;

    /// Drops all entries loaded from `file`, returning how many there were
    fn remove_file(&mut self, file: &Path) -> usize {
        let indices: Vec<usize> = self
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.file == file)
            .map(|(i, _)| i)
            .collect();
        for &i in indices.iter().rev() {
            self.remove(i);
        }
        indices.len()
    }
}
