//! Locator error types.
//!
//! Missing directories, ambiguous matches and "not found" are all part of
//! normal resolution and are reported through the diagnostic log instead.
//! Only a filesystem fault that leaves us with an untrustworthy view of the
//! disk aborts a lookup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a runtime library lookup.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Querying a candidate path failed for a reason other than
    /// "does not exist" or "name too long".
    #[error("Failed to inspect {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LocatorError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type for locator operations.
pub type LocatorResult<T> = Result<T, LocatorError>;

#[cfg(target_os = "linux")]
const ENAMETOOLONG: i32 = 36;
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
const ENAMETOOLONG: i32 = 63;
#[cfg(target_os = "windows")]
const ENAMETOOLONG: i32 = 206; // ERROR_FILENAME_EXCED_RANGE
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "windows"
)))]
const ENAMETOOLONG: i32 = -1;

/// Whether an I/O error reports a path component longer than the OS allows.
///
/// Pathological entries (for example a whole blob pasted into an env var)
/// trip this, and they are treated as non-existent rather than fatal.
pub(crate) fn is_name_too_long(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::InvalidFilename {
        return true;
    }

    err.raw_os_error() == Some(ENAMETOOLONG)
}
