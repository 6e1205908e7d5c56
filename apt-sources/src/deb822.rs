//! Parsing and writing of DEB822 style source lists (`*.sources`)
//!
//! A stanza with several types, URIs or suites declares the cross product of
//! them; it is expanded into one [`SourceEntry`] per combination. Comment-only
//! blocks are kept verbatim and stanzas that fail to parse become a single
//! invalid entry.
use crate::{EntryError, Origin, RepositoryType, SourceEntry};
use deb822_fast::{FromDeb822, FromDeb822Paragraph, Paragraph};
use std::path::Path;

fn deserialize_types(text: &str) -> Result<Vec<RepositoryType>, EntryError> {
    text.split_whitespace().map(str::parse).collect()
}

fn deserialize_words(text: &str) -> Result<Vec<String>, EntryError> {
    Ok(text.split_whitespace().map(str::to_owned).collect())
}

fn deserialize_yesno(text: &str) -> Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected yes or no, got `{other}`")),
    }
}

/// The fields of a stanza that matter for identifying repositories
///
/// Other fields (`Signed-By`, `Architectures`, ...) stay in the raw paragraph
/// and survive a rewrite untouched.
#[derive(FromDeb822, Clone, PartialEq, Debug)]
pub struct Stanza {
    /// `deb` and/or `deb-src`
    #[deb822(field = "Types", deserialize_with = deserialize_types)]
    pub types: Vec<RepositoryType>,
    /// The addresses of the repository
    #[deb822(field = "URIs", deserialize_with = deserialize_words)]
    pub uris: Vec<String>,
    /// Distribution codenames or suite names
    #[deb822(field = "Suites", deserialize_with = deserialize_words)]
    pub suites: Vec<String>,
    /// Sections of the repository, absent for flat repositories
    #[deb822(field = "Components", deserialize_with = deserialize_words)]
    pub components: Option<Vec<String>>,
    /// If `no` the stanza is ignored by APT
    #[deb822(field = "Enabled", deserialize_with = deserialize_yesno)]
    pub enabled: Option<bool>,
}

impl Stanza {
    fn parse(text: &str) -> Result<(Paragraph, Self), EntryError> {
        let paragraph: Paragraph = text
            .parse()
            .map_err(|e: deb822_fast::Error| EntryError::Syntax(e.to_string()))?;
        let stanza = Self::from_paragraph(&paragraph).map_err(EntryError::Syntax)?;
        for (name, values) in [
            ("Types", stanza.types.is_empty()),
            ("URIs", stanza.uris.is_empty()),
            ("Suites", stanza.suites.is_empty()),
        ] {
            if values {
                return Err(EntryError::MissingField(name));
            }
        }
        Ok((paragraph, stanza))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ChunkKind {
    Comment,
    Invalid,
    Stanza(Paragraph),
}

/// A block of consecutive non-blank lines
#[derive(Debug, Clone, PartialEq)]
struct Chunk {
    lines: Vec<String>,
    kind: ChunkKind,
}

impl Chunk {
    fn comments(&self) -> impl Iterator<Item = &String> {
        self.lines.iter().filter(|l| is_comment(l))
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// The layout of a DEB822 file, needed to write it back
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Deb822File {
    chunks: Vec<Chunk>,
}

/// Parses a DEB822 file into its layout and entries
pub(crate) fn parse_file(content: &str, path: &Path) -> (Deb822File, Vec<SourceEntry>) {
    let mut file = Deb822File::default();
    let mut entries = Vec::new();

    let mut blocks: Vec<Vec<String>> = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_owned());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    for (index, lines) in blocks.into_iter().enumerate() {
        if lines.iter().all(|l| is_comment(l)) {
            file.chunks.push(Chunk {
                lines,
                kind: ChunkKind::Comment,
            });
            continue;
        }

        let mut text = lines
            .iter()
            .filter(|l| !is_comment(l))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        text.push('\n');

        match Stanza::parse(&text) {
            Ok((paragraph, stanza)) => {
                entries.extend(expand(&stanza, path, index));
                file.chunks.push(Chunk {
                    lines,
                    kind: ChunkKind::Stanza(paragraph),
                });
            }
            Err(e) => {
                log::debug!("{}: ignoring invalid stanza {}: {}", path.display(), index + 1, e);
                entries.push(SourceEntry {
                    typ: String::new(),
                    uri: String::new(),
                    dist: String::new(),
                    comps: Vec::new(),
                    disabled: false,
                    invalid: true,
                    file: path.to_path_buf(),
                    line: lines.join("\n"),
                    origin: Origin::Stanza(index),
                    disabled_on_load: false,
                });
                file.chunks.push(Chunk {
                    lines,
                    kind: ChunkKind::Invalid,
                });
            }
        }
    }

    (file, entries)
}

fn expand(stanza: &Stanza, path: &Path, index: usize) -> Vec<SourceEntry> {
    let disabled = stanza.enabled == Some(false);
    let comps = stanza.components.clone().unwrap_or_default();

    let mut entries = Vec::new();
    for typ in &stanza.types {
        for uri in &stanza.uris {
            for suite in &stanza.suites {
                let mut entry = SourceEntry::new(
                    typ.to_string(),
                    uri.as_str(),
                    suite.as_str(),
                    comps.iter().map(String::as_str),
                    path,
                );
                entry.disabled = disabled;
                entry.disabled_on_load = disabled;
                entry.origin = Origin::Stanza(index);
                entries.push(entry);
            }
        }
    }
    entries
}

/// Replaces (or appends) the `Enabled` field in the raw lines of a stanza
fn with_enabled(lines: &[String], enabled: bool) -> Vec<String> {
    let value = if enabled { "yes" } else { "no" };
    let mut found = false;
    let mut out: Vec<String> = lines
        .iter()
        .map(|line| {
            let is_enabled_field = line
                .split_once(':')
                .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case("Enabled"));
            if is_enabled_field && !line.starts_with(char::is_whitespace) {
                found = true;
                format!("Enabled: {value}")
            } else {
                line.clone()
            }
        })
        .collect();
    if !found && !enabled {
        out.push(format!("Enabled: {value}"));
    }
    out
}

/// Writes a DEB822 file back out, reflecting the `disabled` flags of its entries
pub(crate) fn render_file(file: &Deb822File, entries: &[&SourceEntry]) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for (index, chunk) in file.chunks.iter().enumerate() {
        let mine: Vec<&SourceEntry> = entries
            .iter()
            .copied()
            .filter(|e| e.origin == Origin::Stanza(index))
            .collect();

        let lines = match &chunk.kind {
            ChunkKind::Comment => chunk.lines.clone(),
            ChunkKind::Invalid | ChunkKind::Stanza(_) if mine.is_empty() => continue,
            ChunkKind::Invalid => chunk.lines.clone(),
            ChunkKind::Stanza(paragraph) => {
                if mine.iter().all(|e| e.disabled == e.disabled_on_load) {
                    chunk.lines.clone()
                } else if mine.iter().all(|e| e.disabled == mine[0].disabled) {
                    with_enabled(&chunk.lines, !mine[0].disabled)
                } else {
                    split_stanza(chunk, paragraph, &mine)
                }
            }
        };

        let mut text = lines.join("\n");
        text.push('\n');
        blocks.push(text);
    }

    blocks.join("\n")
}

/// One stanza per entry, each with its own `Enabled` value
fn split_stanza(chunk: &Chunk, paragraph: &Paragraph, entries: &[&SourceEntry]) -> Vec<String> {
    let mut lines: Vec<String> = chunk.comments().cloned().collect();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let mut split = paragraph.clone();
        split.set("Types", &entry.typ);
        split.set("URIs", &entry.uri);
        split.set("Suites", &entry.dist);
        if entry.disabled {
            split.set("Enabled", "no");
        } else {
            split.remove("Enabled");
        }
        lines.extend(split.to_string().lines().map(str::to_owned));
    }
    lines
}
