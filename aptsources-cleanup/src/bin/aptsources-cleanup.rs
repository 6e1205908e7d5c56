use aptsources_cleanup::cli::{self, Args, Options, EXIT_INTERRUPTED};
use aptsources_cleanup::Console;
use clap::Parser;
use log::{error, warn};
use std::io::{self, IsTerminal};
use std::process::{self, ExitCode};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nAborted.");
        process::exit(EXIT_INTERRUPTED.into());
    }) {
        warn!("Cannot install interrupt handler: {}", e);
    }

    let color = args.color.enabled(io::stdout().is_terminal());
    colored::control::set_override(color);
    let options = Options::from(args);

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    let mut err = io::stderr();
    let mut console = Console::new(&mut input, &mut out, &mut err).with_color(color);

    match cli::run(&options, &mut console) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
