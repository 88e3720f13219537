//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the CUDA runtime locator.
#[derive(Parser)]
#[command(name = "cudaloc")]
#[command(about = "Locate the CUDA runtime library and report on CUDA installations")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
