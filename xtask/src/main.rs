//! # crpi-build
//!
//! Builds the CRPI library stack by running `make` in each library directory.
//!
//! ```bash
//! crpi-build -a                    # build every library, in order
//! crpi-build --ulapi -a            # same, bootstrapping ULAPI before CRPI
//! crpi-build -c                    # make clean in every library
//! crpi-build -plus kMeans CRPI     # make all, then make kMeans, make CRPI
//! ```
//!
//! Every run ends with `done`. The exit status is non-zero when any step failed.

use clap::Parser;
use std::process::ExitCode;

mod app;
mod cli;
mod compare;
mod plan;
mod runner;
mod summary;
mod tasks;
mod util;

const COMPLETION_MARKER: &str = "done";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("CRPI_LOG", "warn")).init();

    let cli = crate::cli::Cli::parse();
    let result = crate::app::run(&cli);

    let code = match result {
        Ok(summary) if summary.succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    };
    println!("{COMPLETION_MARKER}");
    code
}
