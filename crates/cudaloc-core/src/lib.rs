//! Core of the CUDA runtime library locator.
//!
//! Given a snapshot of the environment and a way to ask the filesystem
//! whether paths exist, pick the single `libcudart` the process should
//! load, and record why along the way:
//! - [`pathset`]: parse path lists and drop entries that do not exist
//! - [`matcher`]: find the runtime library inside existing directories
//! - [`env`]: snapshot the environment and filter candidate variables
//! - [`resolver`]: walk the prioritized tiers and pick one library
//! - [`diagnostics`]: the warning/info log a report tool prints afterwards
//!
//! # Design
//!
//! - No interactive/terminal I/O; adapters print the log themselves
//! - Filesystem access goes through the [`FsProbe`] port
//! - Missing or ambiguous results are logged, never returned as errors

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod diagnostics;
pub mod env;
mod error;
pub mod framework;
pub mod fs;
pub mod matcher;
pub mod pathset;
pub mod platform;
pub mod resolver;

pub use config::LocatorConfig;
pub use diagnostics::{DiagnosticLog, LogEntry, Severity};
pub use env::{EnvironmentSnapshot, IGNORED_ENV_VARS, candidate_env_vars, looks_like_path_list};
pub use error::{LocatorError, LocatorResult};
pub use framework::framework_lib_dir;
pub use fs::{FsProbe, StdFsProbe};
pub use matcher::{find_library_in, warn_on_duplicates};
pub use pathset::{extract_candidate_paths, remove_non_existent_dirs, resolve_paths_list};
pub use platform::{Platform, PlatformKind};
pub use resolver::{LibrarySource, Locator, Probe, ResolvedLibrary, Tier, TierKind, default_tiers};
