//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub fn execute(...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Capture the environment once
//!   2. Call into `cudaloc-core`
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain resolution logic.

pub mod bug_report;
pub mod env;
pub mod locate;

use std::path::PathBuf;

use cudaloc_core::{EnvironmentSnapshot, LocatorConfig, framework_lib_dir};

use crate::python::discover_site_packages;

/// Build the locator configuration for this process.
///
/// The framework library directory comes from, in order: the explicit
/// argument, `CUDALOC_FRAMEWORK_LIB_DIR`, then the site-packages of the
/// python interpreter on `PATH`.
pub fn locator_config(
    snapshot: &EnvironmentSnapshot,
    framework_dir: Option<PathBuf>,
) -> LocatorConfig {
    let config = LocatorConfig::from_env(snapshot);

    if let Some(dir) = framework_dir {
        return config.with_framework_lib_dir(dir);
    }
    if config.framework_lib_dir.is_some() {
        return config;
    }

    match framework_lib_dir(&discover_site_packages()) {
        Some(dir) => config.with_framework_lib_dir(dir),
        None => config,
    }
}
