//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cudaloc_cli::{Cli, Commands, exit_code_for, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Locate {
            json,
            framework_lib_dir,
        } => handlers::locate::execute(framework_lib_dir, json),
        Commands::Env => handlers::env::execute(),
        Commands::BugReport => handlers::bug_report::execute(),
    }
}

fn main() -> ExitCode {
    // Load .env before the environment snapshot is taken
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = u8::try_from(exit_code_for(&err)).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
