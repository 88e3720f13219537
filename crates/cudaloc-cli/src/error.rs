//! CLI-specific error types and exit code mapping.

use cudaloc_core::LocatorError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The lookup ran to completion without finding the runtime library.
    #[error("{0} was not found in any searched location")]
    NotFound(String),

    /// The lookup was aborted by a filesystem fault.
    #[error("{0}")]
    Locator(#[from] LocatorError),

    /// IO error (stdout closed, unreadable directory, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error (library not found)
    /// - 71: OS error while inspecting the filesystem (EX_OSERR)
    /// - 74: IO error (EX_IOERR)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound(_) => 1,
            CliError::Locator(_) => 71,
            CliError::Io(_) => 74,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

/// Exit code for an error bubbling out of a handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>()
        .map_or(1, CliError::exit_code)
}
