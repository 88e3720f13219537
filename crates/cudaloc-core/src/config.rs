//! Locator configuration.
//!
//! Resolution order for each setting:
//! 1. Explicit builder call (highest priority)
//! 2. `CUDALOC_*` variable in the environment snapshot
//! 3. Platform default

use std::path::{Path, PathBuf};

use crate::env::EnvironmentSnapshot;
use crate::platform::Platform;

/// Overrides the runtime library file name (e.g. `cudart64_12.dll`).
pub const RUNTIME_LIB_VAR: &str = "CUDALOC_RUNTIME_LIB";

/// Overrides the default install directory searched last.
pub const DEFAULT_DIR_VAR: &str = "CUDALOC_DEFAULT_DIR";

/// Supplies the framework-bundled library directory directly.
pub const FRAMEWORK_LIB_DIR_VAR: &str = "CUDALOC_FRAMEWORK_LIB_DIR";

/// Settings for one runtime library lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    pub platform: Platform,
    /// Library folder shipped inside the deep-learning framework install
    /// (for PyTorch, `<site-packages>/torch/lib`). `None` skips that tier.
    pub framework_lib_dir: Option<PathBuf>,
}

impl LocatorConfig {
    /// Configuration for the given platform with no overrides.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            framework_lib_dir: None,
        }
    }

    /// Detect the host platform and apply `CUDALOC_*` overrides.
    pub fn from_env(snapshot: &EnvironmentSnapshot) -> Self {
        let mut platform = Platform::detect(snapshot);

        if let Some(name) = non_empty(snapshot, RUNTIME_LIB_VAR) {
            platform.runtime_lib_name = name.to_string();
        }
        if let Some(dir) = non_empty(snapshot, DEFAULT_DIR_VAR) {
            platform.default_install_dir = PathBuf::from(dir);
        }

        Self {
            platform,
            framework_lib_dir: non_empty(snapshot, FRAMEWORK_LIB_DIR_VAR).map(PathBuf::from),
        }
    }

    /// Set the framework-bundled library directory, replacing any override.
    #[must_use]
    pub fn with_framework_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.framework_lib_dir = Some(dir.into());
        self
    }

    /// Replace the default install directory.
    #[must_use]
    pub fn with_default_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.platform.default_install_dir = dir.into();
        self
    }

    pub fn runtime_lib_name(&self) -> &str {
        &self.platform.runtime_lib_name
    }

    pub fn default_install_dir(&self) -> &Path {
        &self.platform.default_install_dir
    }
}

fn non_empty<'a>(snapshot: &'a EnvironmentSnapshot, name: &str) -> Option<&'a str> {
    snapshot
        .get(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
