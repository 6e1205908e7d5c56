use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use apt_sources::{SourceCollection, SourcesList};
use aptsources_cleanup::cli::{self, Args, Options};
use aptsources_cleanup::Console;
use clap::Parser;
use indoc::indoc;
use tempfile::TempDir;

struct Root {
    dir: TempDir,
}

impl Root {
    fn new(main: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sources.list.d")).unwrap();
        fs::write(dir.path().join("sources.list"), main).unwrap();
        Self { dir }
    }

    fn part(&self, name: &str) -> PathBuf {
        self.dir.path().join("sources.list.d").join(name)
    }

    fn write_part(&self, name: &str, content: &str) -> PathBuf {
        let path = self.part(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn main(&self) -> PathBuf {
        self.dir.path().join("sources.list")
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

struct Outcome {
    code: u8,
    out: String,
    err: String,
}

fn run(root: &Root, args: &[&str], input: &str) -> Outcome {
    let root_arg = root.path().display().to_string();
    let argv = ["aptsources-cleanup", "--sources-root", root_arg.as_str()]
        .into_iter()
        .chain(args.iter().copied());
    let options = Options::from(Args::try_parse_from(argv).unwrap());

    let mut input = Cursor::new(input.to_string());
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let mut console = Console::new(&mut input, &mut out, &mut err);
    let code = cli::run(&options, &mut console).unwrap();
    drop(console);

    Outcome {
        code,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

const MAIN: &str = indoc! {"
    # Debian mirror
    deb http://example.com/debian stable main
"};

#[test]
fn test_declined_leaves_files_alone() {
    let root = Root::new(MAIN);
    let dupe = root.write_part("dupe.list", "deb https://example.com/debian/ stable main\n");

    let outcome = run(&root, &[], "n\n");
    assert_eq!(outcome.code, 2);
    assert!(outcome.out.contains("Overlapping source entries:"));
    assert!(outcome.err.contains("Aborted."));
    assert!(!outcome.out.contains("empty sourcelist files"));
    assert_eq!(fs::read_to_string(root.main()).unwrap(), MAIN);
    assert_eq!(
        fs::read_to_string(dupe).unwrap(),
        "deb https://example.com/debian/ stable main\n"
    );
}

#[test]
fn test_scheme_class_duplicate_is_disabled() {
    let root = Root::new(MAIN);
    let dupe = root.write_part(
        "dupe.list",
        indoc! {"
            deb https://example.com/debian stable main
            deb http://example.com/b stable main
        "},
    );

    let outcome = run(&root, &["--yes"], "");
    assert_eq!(outcome.code, 0);
    assert_eq!(outcome.out.matches("Overlapping source entries:").count(), 1);
    assert!(outcome.out.contains("1 source entry was disabled:"));
    assert!(!outcome.out.contains("Do you want to save"));
    assert_eq!(fs::read_to_string(root.main()).unwrap(), MAIN);
    assert_eq!(
        fs::read_to_string(dupe).unwrap(),
        indoc! {"
            # deb https://example.com/debian stable main
            deb http://example.com/b stable main
        "}
    );
}

#[test]
fn test_empty_relation_keeps_schemes_apart() {
    let root = Root::new(MAIN);
    root.write_part("dupe.list", "deb https://example.com/debian stable main\n");

    let outcome = run(&root, &["--equivalent-schemes", ""], "");
    assert_eq!(outcome.code, 0);
    assert!(outcome.out.starts_with("No duplicate entries were found.\n"));
}

#[test]
fn test_dry_run_changes_nothing() {
    let root = Root::new(MAIN);
    let dupe = root.write_part("dupe.list", "deb ftp://example.com/debian stable main\n");

    let outcome = run(&root, &["--dry-run"], "");
    assert_eq!(outcome.code, 0);
    assert!(outcome.out.contains("1 source entry was disabled:"));
    assert!(!outcome.out.contains("Do you want to remove it?"));
    assert_eq!(
        fs::read_to_string(dupe).unwrap(),
        "deb ftp://example.com/debian stable main\n"
    );
}

#[test]
fn test_empty_file_is_removed_with_companion() {
    let root = Root::new(MAIN);
    let old = root.write_part(
        "old.list",
        indoc! {"
            # deb http://old.example.com/debian stable main
            # deb-src http://old.example.com/debian stable main
        "},
    );
    let companion = root.write_part("old.list.save", "");

    let outcome = run(&root, &[], "yes\n");
    assert_eq!(outcome.code, 0);
    assert!(outcome.out.starts_with("No duplicate entries were found.\n"));
    assert!(outcome
        .out
        .contains(&format!("'{}' contains no valid and enabled repository lines.", old.display())));
    assert!(outcome.out.ends_with("1 of 1 empty sourcelist files removed.\n"));
    assert!(!old.exists());
    assert!(!companion.exists());
    assert!(outcome.err.contains(&format!("'{}' removed.", old.display())));
    assert!(outcome.err.contains(&format!("'{}' removed.", companion.display())));
}

#[test]
fn test_disabled_duplicate_leaves_empty_file() {
    let root = Root::new(MAIN);
    let dupe = root.write_part("dupe.list", "deb https://example.com/debian stable main\n");
    let other = root.write_part("other.list", "# deb http://other.example.com/ stable main\n");

    // Save, keep dupe.list, display other.list and then remove it.
    let outcome = run(&root, &[], "y\nn\ndisplay\ny\n");
    assert_eq!(outcome.code, 0);
    assert!(dupe.exists());
    assert_eq!(
        fs::read_to_string(&dupe).unwrap(),
        "# deb https://example.com/debian stable main\n"
    );
    assert!(!other.exists());
    assert!(outcome
        .out
        .contains("# deb http://other.example.com/ stable main\n"));
    assert!(outcome.out.ends_with("1 of 2 empty sourcelist files removed.\n"));
}

#[test]
fn test_yes_still_asks_before_removing_files() {
    let root = Root::new(MAIN);
    let dupe = root.write_part("dupe.list", "deb https://example.com/debian stable main\n");

    let outcome = run(&root, &["--yes"], "n\n");
    assert_eq!(outcome.code, 0);
    assert!(!outcome.out.contains("Do you want to save"));
    assert!(outcome.out.contains(&format!(
        "'{}' contains no valid and enabled repository lines.",
        dupe.display()
    )));
    assert_eq!(outcome.out.matches("Do you want to remove it?").count(), 1);
    assert!(outcome.out.ends_with("0 of 1 empty sourcelist files removed.\n"));
    assert!(dupe.exists());
    assert_eq!(
        fs::read_to_string(&dupe).unwrap(),
        "# deb https://example.com/debian stable main\n"
    );
}

#[test]
fn test_partially_disabled_stanza_is_split() {
    let root = Root::new(MAIN);
    let sources = root.write_part(
        "mirrors.sources",
        indoc! {"
            Types: deb
            URIs: https://example.com/debian https://mirror.example.org/debian
            Suites: stable
            Components: main
        "},
    );

    let outcome = run(&root, &["-y"], "n\n");
    assert_eq!(outcome.code, 0);
    assert!(fs::read_to_string(&sources).unwrap().contains("Enabled: no"));

    let reloaded = SourcesList::load_root(root.path()).unwrap();
    let state: Vec<(&str, bool)> = reloaded
        .entries()
        .iter()
        .filter(|e| e.file == sources)
        .map(|e| (e.uri.as_str(), e.disabled))
        .collect();
    assert_eq!(
        state,
        [
            ("https://example.com/debian", true),
            ("https://mirror.example.org/debian", false),
        ]
    );
}

#[test]
fn test_missing_root() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let options = Options::from(
        Args::try_parse_from([
            "aptsources-cleanup",
            "--sources-root",
            missing.to_str().unwrap(),
        ])
        .unwrap(),
    );
    let mut input = Cursor::new(String::new());
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let mut console = Console::new(&mut input, &mut out, &mut err);
    assert_eq!(cli::run(&options, &mut console).unwrap(), cli::EXIT_ENVIRONMENT);
}

#[test]
fn test_debug_sources_dir() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("a.list"),
        "deb http://example.com/debian stable main\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("nested").join("b.list"),
        "deb http://example.com/debian/./ stable main\n",
    )
    .unwrap();

    let options = Options::from(
        Args::try_parse_from([
            "aptsources-cleanup",
            "--no-act",
            "--debug-sources-dir",
            dir.path().to_str().unwrap(),
        ])
        .unwrap(),
    );
    let mut input = Cursor::new(String::new());
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let mut console = Console::new(&mut input, &mut out, &mut err);
    assert_eq!(cli::run(&options, &mut console).unwrap(), 0);
    drop(console);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("1 source entry was disabled:"));
    assert!(out.contains("b.list"));
}
