use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "crpi-build")]
#[command(about = "Build or clean the CRPI library stack (wraps make in each library directory)")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Repository root that every library directory is resolved against.
    #[arg(long, env = "CRPI_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Native build tool invoked for every build/clean step.
    #[arg(long, env = "MAKE", default_value = "make", value_name = "PROGRAM")]
    pub make: String,

    /// JSON build plan replacing the built-in library list.
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    #[arg(
        long,
        help = "Unpack, build, install and self-test ULAPI as part of `-a` (runs before CRPI)."
    )]
    pub ulapi: bool,

    #[arg(
        long,
        help = "Capture each step's output instead of streaming it. Output of failed steps is echoed to stderr."
    )]
    pub capture: bool,

    /// Write the per-step results of this run as JSON.
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// `-a` (build all), `-c` (clean all) or `-plus <target>...`.
    ///
    /// Options must come before these; everything from the first positional on is taken verbatim.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub request: Vec<String>,
}
