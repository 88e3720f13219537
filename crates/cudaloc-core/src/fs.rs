//! Filesystem port for existence checks.
//!
//! The locator never touches `std::fs` directly. It asks an [`FsProbe`],
//! which keeps resolution testable against fake trees and lets tests assert
//! which paths were (or were not) inspected.
//!
//! # Design Notes
//!
//! - Core owns the trait and the default `std::fs` implementation
//! - Tests inject a mock generated by `mockall`

use std::fs;
use std::io;
use std::path::Path;

/// Port for filesystem existence queries.
#[cfg_attr(test, mockall::automock)]
pub trait FsProbe: Send + Sync {
    /// Whether anything exists at `path`.
    ///
    /// Returns `Ok(false)` for paths that are simply absent. Any other
    /// failure is reported as an error and left to the caller to classify.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Whether `path` exists and is a regular file (symlinks followed).
    ///
    /// Absence is `Ok(false)`, as for [`FsProbe::exists`].
    fn is_file(&self, path: &Path) -> io::Result<bool>;
}

/// [`FsProbe`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFsProbe;

impl StdFsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl FsProbe for StdFsProbe {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        metadata_or_absent(path).map(|meta| meta.is_some())
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        metadata_or_absent(path).map(|meta| meta.is_some_and(|m| m.is_file()))
    }
}

fn metadata_or_absent(path: &Path) -> io::Result<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
