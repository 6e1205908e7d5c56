//! Parsing and writing of one-line style source lists (`sources.list`, `*.list`)
//!
//! The format is described in `sources.list(5)`:
//!
//! ```text
//! deb [ option1=value1 option2=value2 ] uri suite [component1] [component2] [...]
//! ```
//!
//! A line commented out with `#` that still parses as an entry is a disabled
//! entry. Every other line (blank, comment, garbage) becomes an invalid entry so
//! that writing the file back reproduces it.
use crate::{EntryError, Origin, RepositoryType, SourceEntry};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Whitespace separated words, except that `[...]` groups may contain whitespace,
/// e.g. `cdrom:[Debian GNU/Linux 12]/` or an options block.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*\[[^\]]*\]\S*|\S+").expect("valid token pattern"));

/// The fields of a one-line entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyLine {
    /// Legacy lists format support one type per line
    pub typ: RepositoryType,
    /// Options given in brackets, in declaration order
    pub options: Vec<(String, String)>,
    /// Single repo address
    pub uri: String,
    /// The distribution name as codename or suite type (like `stable` or `testing`)
    pub dist: String,
    /// Sections of the repository, empty for a flat repository
    pub comps: Vec<String>,
}

impl std::str::FromStr for LegacyLine {
    type Err = EntryError;

    /// Parses the text of an entry; leading comment markers must already be stripped
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = match text.find('#') {
            Some(i) => &text[..i],
            None => text,
        };
        let mut tokens = TOKEN.find_iter(text).map(|m| m.as_str()).peekable();

        let typ: RepositoryType = tokens.next().ok_or(EntryError::NotAnEntry)?.parse()?;

        let mut options = Vec::new();
        if let Some(block) = tokens.next_if(|t| t.starts_with('[')) {
            let inner = block
                .strip_prefix('[')
                .and_then(|b| b.strip_suffix(']'))
                .ok_or_else(|| EntryError::InvalidOptions(block.to_owned()))?;
            for option in inner.split_whitespace() {
                let (key, value) = option
                    .split_once('=')
                    .ok_or_else(|| EntryError::InvalidOptions(option.to_owned()))?;
                options.push((key.to_owned(), value.to_owned()));
            }
        }

        let uri = tokens.next().ok_or(EntryError::MissingUri)?.to_owned();
        let dist = tokens.next().ok_or(EntryError::MissingDist)?.to_owned();
        let comps: Vec<String> = tokens.map(str::to_owned).collect();

        if dist.ends_with('/') {
            if !comps.is_empty() {
                return Err(EntryError::UnexpectedComponents);
            }
        } else if comps.is_empty() {
            return Err(EntryError::MissingComponents);
        }

        Ok(Self {
            typ,
            options,
            uri,
            dist,
            comps,
        })
    }
}

/// Turns one raw line into an entry, marking it invalid if it doesn't parse
pub(crate) fn parse_entry(raw: &str, file: PathBuf, origin: Origin) -> SourceEntry {
    let disabled = raw.trim_start().starts_with('#');
    let body = raw.trim_start_matches(|c: char| c == '#' || c.is_whitespace());

    match body.parse::<LegacyLine>() {
        Ok(parsed) => SourceEntry {
            typ: parsed.typ.to_string(),
            uri: parsed.uri,
            dist: parsed.dist,
            comps: parsed.comps,
            disabled,
            invalid: false,
            file,
            line: raw.to_owned(),
            origin,
            disabled_on_load: disabled,
        },
        Err(e) => {
            if !disabled && e != EntryError::NotAnEntry {
                log::debug!("{}: ignoring invalid line {:?}: {}", file.display(), raw, e);
            }
            SourceEntry {
                typ: String::new(),
                uri: String::new(),
                dist: String::new(),
                comps: Vec::new(),
                disabled,
                invalid: true,
                file,
                line: raw.to_owned(),
                origin,
                disabled_on_load: disabled,
            }
        }
    }
}

/// Parses all lines of a one-line style file
pub(crate) fn parse_file(content: &str, path: &Path) -> Vec<SourceEntry> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| parse_entry(line, path.to_path_buf(), Origin::Line(i)))
        .collect()
}

/// The text a line should have after the entry's `disabled` flag was changed
pub(crate) fn render_line(entry: &SourceEntry) -> String {
    if entry.invalid || entry.disabled == entry.disabled_on_load {
        entry.line.clone()
    } else if entry.disabled {
        format!("# {}", entry.line.trim_start())
    } else {
        entry.body().to_owned()
    }
}

/// Writes the entries of one file back out as text, in line order
pub(crate) fn render_file<'a>(entries: impl IntoIterator<Item = &'a SourceEntry>) -> String {
    let mut lines: Vec<(usize, String)> = entries
        .into_iter()
        .map(|e| {
            let pos = match e.origin {
                Origin::Line(n) => n,
                _ => usize::MAX,
            };
            (pos, render_line(e))
        })
        .collect();
    lines.sort_by_key(|(pos, _)| *pos);

    let mut text = String::new();
    for (_, line) in lines {
        text.push_str(&line);
        text.push('\n');
    }
    text
}
