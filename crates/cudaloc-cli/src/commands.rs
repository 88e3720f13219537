//! Top-level subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the CUDA runtime library this environment would load
    Locate {
        /// Print the result and diagnostic log as JSON
        #[arg(long)]
        json: bool,

        /// Framework-bundled library directory (e.g. `<site-packages>/torch/lib`).
        /// Discovered from the python interpreter on PATH when omitted.
        #[arg(long, env = "CUDALOC_FRAMEWORK_LIB_DIR")]
        framework_lib_dir: Option<PathBuf>,
    },

    /// List the environment variables that are scanned for CUDA libraries
    Env,

    /// Dump CUDA installation details for a bug report
    BugReport,
}
