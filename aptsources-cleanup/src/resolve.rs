//! The interactive drivers: disabling duplicate entries and removing empty
//! source lists.
use std::io::Write;
use std::path::Path;

use apt_sources::{SourceCollection, SourceEntry};
use log::{debug, info};

use crate::canonical::EquivalenceRelation;
use crate::choices::Choices;
use crate::console::Console;
use crate::detect::{find_duplicates, find_empty_files};
use crate::error::ResolveError;
use crate::fileutils::{display_file, remove_sources_files};

/// Whether changes are saved without asking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Ask the operator
    #[default]
    Ask,
    /// Save non-destructive changes without asking
    Yes,
    /// Never change anything
    No,
}

/// Outcome of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything that was decided on was done
    Success,
    /// Some files couldn't be removed
    PartialFailure,
    /// The operator didn't want the changes saved
    Declined,
}

impl Status {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::PartialFailure => 1,
            Status::Declined => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveAnswer {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveAnswer {
    Yes,
    No,
    All,
    NoneOfThem,
    Display,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Delete,
    Keep,
}

/// Whether the next empty file needs a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    AskPerFile,
    Sticky(Decision),
}

/// Disables every duplicate entry but the first one of its group, reports
/// what was done and saves it if allowed
///
/// A group whose first entry was already disabled for an earlier group keeps
/// its first entry that is still active.
pub fn handle_duplicates<S: SourceCollection + ?Sized>(
    sources: &mut S,
    apply: ApplyMode,
    relation: Option<&EquivalenceRelation>,
    console: &mut Console<'_>,
) -> Result<Status, ResolveError> {
    let groups = find_duplicates(sources.entries(), relation)?;
    if groups.is_empty() {
        writeln!(console.out(), "No duplicate entries were found.")?;
        return Ok(Status::Success);
    }
    debug!("Found {} groups of overlapping entries", groups.len());

    let mut disabled: Vec<usize> = Vec::new();
    for group in &groups {
        let Some(kept) = group
            .members
            .iter()
            .position(|&i| sources.entries()[i].is_active())
        else {
            continue;
        };
        let original = group.members[kept];
        for &duplicate in &group.members[kept + 1..] {
            if !sources.entries()[duplicate].is_active() {
                continue;
            }
            sources.entry_mut(duplicate).disabled = true;
            disabled.push(duplicate);
            let entries = sources.entries();
            print_overlap(console, &entries[original], &entries[duplicate])?;
        }
    }

    let entries = sources.entries();
    let out = console.out();
    if disabled.len() == 1 {
        writeln!(out, "1 source entry was disabled:")?;
    } else {
        writeln!(out, "{} source entries were disabled:", disabled.len())?;
    }
    for &i in &disabled {
        writeln!(out, "  {}: {}", entries[i].file.display(), entries[i])?;
    }
    writeln!(out)?;

    match apply {
        ApplyMode::No => {
            writeln!(console.out(), "Dry run: nothing was saved.")?;
            return Ok(Status::Success);
        }
        ApplyMode::Ask => {
            let choices = Choices::new(
                [(SaveAnswer::Yes, "yes"), (SaveAnswer::No, "no")],
                Some(SaveAnswer::No),
            );
            let answer = choices.ask(
                console,
                "Do you want to save these changes?",
                Some(SaveAnswer::No),
            )?;
            if answer != Some(SaveAnswer::Yes) {
                writeln!(console.err(), "Aborted.")?;
                return Ok(Status::Declined);
            }
        }
        ApplyMode::Yes => {}
    }

    sources.save()?;
    info!("Disabled {} duplicate entries", disabled.len());
    Ok(Status::Success)
}

fn print_overlap(
    console: &mut Console<'_>,
    original: &SourceEntry,
    duplicate: &SourceEntry,
) -> std::io::Result<()> {
    let out = console.out();
    writeln!(out, "Overlapping source entries:")?;
    for (n, entry) in [original, duplicate].into_iter().enumerate() {
        writeln!(out, "  {}. file '{}':", n + 1, entry.file.display())?;
        writeln!(out, "     {}", entry.line.trim())?;
    }
    writeln!(out, "I disabled all but the first entry.")?;
    writeln!(out)
}

/// Offers to remove every source list without an active entry
///
/// The operator answers per file or once for all remaining files. Removed
/// files lose their entries in `sources`.
pub fn handle_empty_files<S: SourceCollection + ?Sized>(
    sources: &mut S,
    console: &mut Console<'_>,
) -> Result<Status, ResolveError> {
    let empty = find_empty_files(sources.entries());
    let total = empty.len();
    let mut removed = 0;
    let mut failed = false;
    let mut state = BatchState::AskPerFile;

    for file in &empty {
        let decision = match state {
            BatchState::Sticky(decision) => decision,
            BatchState::AskPerFile => {
                let (decision, next) = ask_about(console, file.path())?;
                state = next;
                decision
            }
        };
        if decision == Decision::Keep {
            continue;
        }
        let removal = remove_sources_files(console, file.path())?;
        failed |= removal.failed;
        if removal.removed {
            removed += 1;
            sources.remove_file(file.path());
        }
    }

    if total > 0 {
        writeln!(console.out())?;
        writeln!(
            console.out(),
            "{removed} of {total} empty sourcelist files removed."
        )?;
    }

    Ok(if failed {
        Status::PartialFailure
    } else {
        Status::Success
    })
}

fn ask_about(
    console: &mut Console<'_>,
    path: &Path,
) -> std::io::Result<(Decision, BatchState)> {
    let choices = Choices::new(
        [
            (RemoveAnswer::Yes, "yes"),
            (RemoveAnswer::No, "no"),
            (RemoveAnswer::All, "all"),
            (RemoveAnswer::NoneOfThem, "none"),
            (RemoveAnswer::Display, "display"),
        ],
        Some(RemoveAnswer::No),
    );
    loop {
        writeln!(
            console.out(),
            "'{}' contains no valid and enabled repository lines.",
            path.display()
        )?;
        let answer = choices.ask(
            console,
            "Do you want to remove it?",
            Some(RemoveAnswer::NoneOfThem),
        )?;
        match answer {
            Some(RemoveAnswer::Yes) => return Ok((Decision::Delete, BatchState::AskPerFile)),
            Some(RemoveAnswer::No) => return Ok((Decision::Keep, BatchState::AskPerFile)),
            Some(RemoveAnswer::All) => {
                return Ok((Decision::Delete, BatchState::Sticky(Decision::Delete)))
            }
            Some(RemoveAnswer::NoneOfThem) => {
                return Ok((Decision::Keep, BatchState::Sticky(Decision::Keep)))
            }
            Some(RemoveAnswer::Display) => {
                display_file(console, path)?;
                writeln!(console.out())?;
            }
            None => {}
        }
    }
}
