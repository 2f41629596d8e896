//! tickcell - Main Entry Point
//!
//! Command-line front end for inspecting what the library does to a
//! document: cleans stale annotations on open, then prints the instrumented
//! HTML render with table-cell checkboxes turned into interactive controls.

use std::path::PathBuf;
use std::process::ExitCode;

use log::info;

use tickcell::config::load_config;
use tickcell::files::{on_file_opened, DocumentStore, FsStore};
use tickcell::preview::render_instrumented;
use tickcell::Result;

/// Application name constant.
const APP_NAME: &str = "tickcell";

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("Usage: {} <document.md>", APP_NAME);
            return ExitCode::FAILURE;
        }
    };

    match run(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", APP_NAME, err);
            ExitCode::FAILURE
        }
    }
}

fn run(path: PathBuf) -> Result<()> {
    info!("Starting {}", APP_NAME);

    let settings = load_config();
    info!("In-cell drift tolerance: {}", settings.in_cell_tolerance);

    let store = FsStore::new();
    if on_file_opened(&store, &path)? {
        info!("Cleaned stale annotations in {}", path.display());
    }

    let markdown = store.read(&path)?;
    print!("{}", render_instrumented(&markdown));
    Ok(())
}
