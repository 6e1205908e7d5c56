//! Command line arguments and the top-level workflow.
use std::io::Write;
use std::path::PathBuf;

use apt_sources::sources_list::DEFAULT_ROOT;
use apt_sources::{SourceCollection, SourcesList};
use clap::{Parser, ValueEnum};
use log::debug;

use crate::canonical::EquivalenceRelation;
use crate::console::Console;
use crate::error::ResolveError;
use crate::resolve::{handle_duplicates, handle_empty_files, ApplyMode, Status};

/// Exit code when the APT configuration can't be found or read
pub const EXIT_ENVIRONMENT: u8 = 127;

/// Exit code after an interrupt
pub const EXIT_INTERRUPTED: u8 = 130;

/// Default of `--debug-sources-dir` without a value
pub const DEBUG_SOURCES_DIR: &str = "./test/sources.list.d";

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aptsources-cleanup",
    version,
    about = "Detect and disable duplicate APT source entries and remove empty source lists",
    long_about = None,
    after_help = "Exit status:
  0    success
  1    some files could not be removed
  2    the changes were not saved
  127  no APT configuration was found
  130  interrupted

Examples:
  aptsources-cleanup
  aptsources-cleanup --dry-run
  aptsources-cleanup --equivalent-schemes 'http,https;tor+http,tor+https'"
)]
pub struct Args {
    /// Apply all non-destructive changes without asking (removing files is still confirmed)
    #[arg(short = 'y', long = "yes", conflicts_with = "no_act")]
    pub yes: bool,

    /// Never apply changes, only show what would be done
    #[arg(short = 'n', long = "no-act", visible_alias = "dry-run")]
    pub no_act: bool,

    /// Schemes considered interchangeable: ';'-separated classes of ','-separated
    /// schemes; an empty value compares schemes literally
    #[arg(
        long = "equivalent-schemes",
        value_name = "SCHEMES",
        default_value = "http,https,ftp"
    )]
    pub equivalent_schemes: EquivalenceRelation,

    /// Directory holding sources.list and sources.list.d
    #[arg(
        long = "sources-root",
        value_name = "DIR",
        env = "APTSOURCES_CLEANUP_ROOT",
        default_value = DEFAULT_ROOT
    )]
    pub sources_root: PathBuf,

    /// Load every source list below DIR instead of the system configuration
    #[arg(
        long = "debug-sources-dir",
        value_name = "DIR",
        num_args = 0..=1,
        default_missing_value = DEBUG_SOURCES_DIR
    )]
    pub debug_sources_dir: Option<PathBuf>,

    /// When to style prompts
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Value of `--color`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Style when writing to a terminal
    Auto,
    /// Always style
    Always,
    /// Never style
    Never,
}

impl ColorChoice {
    /// Resolves `Auto` against whether output goes to a terminal
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Where the source lists come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcesLocation {
    /// An APT configuration root like `/etc/apt`
    Root(PathBuf),
    /// A directory searched recursively for list files
    Directory(PathBuf),
}

/// Settings of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Whether to save without asking
    pub apply: ApplyMode,
    /// Scheme folding, empty for none
    pub equivalent_schemes: EquivalenceRelation,
    /// What to load
    pub source: SourcesLocation,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        let apply = match (args.yes, args.no_act) {
            (true, _) => ApplyMode::Yes,
            (_, true) => ApplyMode::No,
            _ => ApplyMode::Ask,
        };
        let source = match args.debug_sources_dir {
            Some(dir) => SourcesLocation::Directory(dir),
            None => SourcesLocation::Root(args.sources_root),
        };
        Self {
            apply,
            equivalent_schemes: args.equivalent_schemes,
            source,
        }
    }
}

/// Loads the source lists and runs both drivers, returning the exit code
pub fn run(options: &Options, console: &mut Console<'_>) -> Result<u8, ResolveError> {
    let mut sources = match &options.source {
        SourcesLocation::Root(root) => match SourcesList::load_root(root) {
            Ok(sources) => sources,
            Err(e) => {
                writeln!(console.err(), "Error: {e}")?;
                writeln!(
                    console.err(),
                    "Is this a Debian-based system using APT? Point --sources-root (or \
                     APTSOURCES_CLEANUP_ROOT) at the directory containing sources.list."
                )?;
                return Ok(EXIT_ENVIRONMENT);
            }
        },
        SourcesLocation::Directory(dir) => {
            if !dir.is_dir() {
                writeln!(console.err(), "Error: No such directory: {}", dir.display())?;
                return Ok(Status::PartialFailure.exit_code());
            }
            let mut sources = SourcesList::new();
            if let Err(e) = sources.load_dir(dir) {
                writeln!(console.err(), "Error: {e}")?;
                return Ok(Status::PartialFailure.exit_code());
            }
            sources
        }
    };
    debug!("Loaded {} entries", sources.len());

    run_with(&mut sources, options, console)
}

/// Runs both drivers on an already loaded collection
pub fn run_with<S: SourceCollection + ?Sized>(
    sources: &mut S,
    options: &Options,
    console: &mut Console<'_>,
) -> Result<u8, ResolveError> {
    let relation = Some(&options.equivalent_schemes).filter(|r| !r.is_empty());
    let mut status = handle_duplicates(sources, options.apply, relation, console)?;
    if status == Status::Success && options.apply != ApplyMode::No {
        writeln!(console.out())?;
        status = handle_empty_files(sources, console)?;
    }
    Ok(status.exit_code())
}
