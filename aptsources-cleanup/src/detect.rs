//! Detection of redundant source entries and source lists.
//!
//! Both detectors are pure: they look at a slice of entries and report indices
//! into it.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use apt_sources::SourceEntry;

use crate::canonical::{canonical_keys, EquivalenceKey, EquivalenceRelation};
use crate::error::CanonicalizeError;

/// Active entries that resolve to the same repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The shared identity
    pub key: EquivalenceKey,
    /// Indices of the entries, in collection order; at least two
    pub members: Vec<usize>,
}

impl DuplicateGroup {
    /// The entry declared first
    pub fn original(&self) -> usize {
        self.members[0]
    }

    /// All entries but the first
    pub fn duplicates(&self) -> &[usize] {
        &self.members[1..]
    }
}

/// Groups the active entries by their equivalence keys
///
/// Groups come in the order their first key was seen; only groups with at
/// least two members are returned. An entry listing the same component twice
/// is counted once.
pub fn find_duplicates(
    entries: &[SourceEntry],
    relation: Option<&EquivalenceRelation>,
) -> Result<Vec<DuplicateGroup>, CanonicalizeError> {
    let mut index: HashMap<EquivalenceKey, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (i, entry) in entries.iter().enumerate().filter(|(_, e)| e.is_active()) {
        for key in canonical_keys(entry, relation)? {
            match index.entry(key) {
                Entry::Occupied(o) => {
                    let members = &mut groups[*o.get()].members;
                    if members.last() != Some(&i) {
                        members.push(i);
                    }
                }
                Entry::Vacant(v) => {
                    groups.push(DuplicateGroup {
                        key: v.key().clone(),
                        members: vec![i],
                    });
                    v.insert(groups.len() - 1);
                }
            }
        }
    }

    groups.retain(|g| g.members.len() > 1);
    Ok(groups)
}

/// A source list without a single active entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyFile {
    /// The list file
    pub file: PathBuf,
    /// Indices of all entries loaded from it
    pub members: Vec<usize>,
}

impl EmptyFile {
    /// The list file
    pub fn path(&self) -> &Path {
        &self.file
    }
}

/// Finds the files none of whose entries is active, in first-seen order
pub fn find_empty_files(entries: &[SourceEntry]) -> Vec<EmptyFile> {
    let mut files: Vec<(EmptyFile, bool)> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let pos = match files.iter().position(|(f, _)| f.file == entry.file) {
            Some(pos) => pos,
            None => {
                files.push((
                    EmptyFile {
                        file: entry.file.clone(),
                        members: Vec::new(),
                    },
                    false,
                ));
                files.len() - 1
            }
        };
        let (file, active) = &mut files[pos];
        file.members.push(i);
        *active |= entry.is_active();
    }

    files
        .into_iter()
        .filter(|(_, active)| !active)
        .map(|(f, _)| f)
        .collect()
}
