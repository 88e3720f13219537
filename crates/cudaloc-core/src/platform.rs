//! Platform-specific constants for runtime library discovery.
//!
//! The path-list separator, the runtime library file name and the default
//! install location all differ between Unix and Windows. They are carried
//! as a value so tests can exercise either flavor on any host.

use std::env;
use std::path::PathBuf;

use crate::env::EnvironmentSnapshot;

/// Unix runtime library file name.
pub const UNIX_RUNTIME_LIB: &str = "libcudart.so";

/// Windows runtime library file name (CUDA 11.x naming).
pub const WINDOWS_RUNTIME_LIB: &str = "cudart64_110.dll";

/// Default toolkit library directory on Unix.
pub const UNIX_DEFAULT_INSTALL_DIR: &str = "/usr/local/cuda/lib64";

/// Platform flavor the constants were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Unix,
    Windows,
}

/// Platform identity used throughout a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub kind: PlatformKind,
    /// Separator between entries of a path list (`PATH`, `LD_LIBRARY_PATH`).
    pub path_list_separator: char,
    /// File name of the runtime library we are looking for.
    pub runtime_lib_name: String,
    /// Extension of shared libraries, including the leading dot.
    pub shared_lib_extension: &'static str,
    /// Directory searched when no environment variable yields a match.
    pub default_install_dir: PathBuf,
}

impl Platform {
    /// Unix flavor: `:` separated lists, `libcudart.so`.
    pub fn unix() -> Self {
        Self {
            kind: PlatformKind::Unix,
            path_list_separator: ':',
            runtime_lib_name: UNIX_RUNTIME_LIB.to_string(),
            shared_lib_extension: ".so",
            default_install_dir: PathBuf::from(UNIX_DEFAULT_INSTALL_DIR),
        }
    }

    /// Windows flavor: `;` separated lists, `cudart64_110.dll`.
    ///
    /// The default install directory is `<toolkit_root>\bin`, where the
    /// toolkit root normally comes from `CUDA_PATH`.
    pub fn windows(toolkit_root: impl Into<PathBuf>) -> Self {
        Self {
            kind: PlatformKind::Windows,
            path_list_separator: ';',
            runtime_lib_name: WINDOWS_RUNTIME_LIB.to_string(),
            shared_lib_extension: ".dll",
            default_install_dir: toolkit_root.into().join("bin"),
        }
    }

    /// Pick the flavor matching the host this binary was compiled for.
    ///
    /// On Windows the toolkit root is `CUDA_PATH` from the snapshot, falling
    /// back to the current working directory.
    pub fn detect(snapshot: &EnvironmentSnapshot) -> Self {
        if cfg!(windows) {
            let root = snapshot.get("CUDA_PATH").map_or_else(
                || env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
                PathBuf::from,
            );
            Self::windows(root)
        } else {
            Self::unix()
        }
    }

    /// Whether `value` contains a directory separator for this platform.
    pub fn has_dir_separator(&self, value: &str) -> bool {
        match self.kind {
            PlatformKind::Unix => value.contains('/'),
            PlatformKind::Windows => value.contains('\\') || value.contains('/'),
        }
    }
}
