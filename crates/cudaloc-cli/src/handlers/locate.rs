//! Locate command handler.
//!
//! Resolves the runtime library for the current environment and prints it
//! together with the diagnostic log.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use cudaloc_core::{DiagnosticLog, EnvironmentSnapshot, LogEntry, Locator, ResolvedLibrary};

use super::locator_config;
use crate::error::CliError;

/// Machine-readable result of `cudaloc locate --json`.
#[derive(Debug, Serialize)]
pub struct LocateReport {
    pub runtime_lib: String,
    pub library: Option<ResolvedLibrary>,
    pub log: Vec<LogEntry>,
}

/// Execute the locate command.
///
/// Returns [`CliError::NotFound`] after printing the log when no library
/// was found, so scripts can branch on the exit code.
pub fn execute(framework_lib_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let snapshot = EnvironmentSnapshot::capture();
    let config = locator_config(&snapshot, framework_lib_dir);
    let runtime_lib = config.runtime_lib_name().to_string();

    let log = DiagnosticLog::new();
    let library = Locator::new(config)
        .resolve(&snapshot, &log)
        .map_err(CliError::from)?;

    let report = LocateReport {
        runtime_lib,
        library,
        log: log.entries(),
    };

    let rendered = if json {
        format!("{}\n", serde_json::to_string_pretty(&report)?)
    } else {
        render_text(&report)
    };
    write_output(&mut io::stdout().lock(), &rendered)?;

    if report.library.is_none() {
        return Err(CliError::NotFound(report.runtime_lib).into());
    }
    Ok(())
}

/// Write a rendered report, reporting a closed or failing stream as
/// [`CliError::Io`].
pub fn write_output<W: Write>(out: &mut W, rendered: &str) -> Result<(), CliError> {
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Human-readable rendering of a [`LocateReport`].
pub fn render_text(report: &LocateReport) -> String {
    let mut out = String::new();

    match &report.library {
        Some(found) => {
            out.push_str(&format!("{}\n", found.path.display()));
            out.push_str(&format!("  (found via {})\n", found.source));
        }
        None => out.push_str(&format!("{} not found\n", report.runtime_lib)),
    }

    if !report.log.is_empty() {
        out.push('\n');
        for entry in &report.log {
            out.push_str(&format!("{entry}\n"));
        }
    }

    out
}
