//! Python site-packages discovery.
//!
//! The framework-bundled CUDA runtime lives inside the PyTorch install,
//! which only the python interpreter knows how to find. We ask the first
//! interpreter on `PATH` for `site.getsitepackages()`.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[cfg(target_os = "windows")]
const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(target_os = "windows"))]
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

const SITE_PACKAGES_SCRIPT: &str =
    "import json, site; print(json.dumps(site.getsitepackages()))";

/// Errors that can occur while asking python for its site-packages.
#[derive(Error, Debug)]
pub enum PythonProbeError {
    #[error("Python not found in PATH (tried: {0})")]
    PythonNotFound(String),

    #[error("Failed to run {python}: {reason}")]
    ExecFailed { python: PathBuf, reason: String },

    #[error("Unexpected site-packages output: {0}")]
    BadOutput(String),
}

/// Find a python interpreter on `PATH`.
pub fn find_python() -> Result<PathBuf, PythonProbeError> {
    for candidate in PYTHON_CANDIDATES {
        if let Ok(path) = which::which(candidate) {
            return Ok(path);
        }
    }

    Err(PythonProbeError::PythonNotFound(PYTHON_CANDIDATES.join(", ")))
}

/// Ask `python` for its site-packages directories.
pub fn site_packages_of(python: &Path) -> Result<Vec<PathBuf>, PythonProbeError> {
    let output = Command::new(python)
        .args(["-c", SITE_PACKAGES_SCRIPT])
        .output()
        .map_err(|e| PythonProbeError::ExecFailed {
            python: python.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PythonProbeError::ExecFailed {
            python: python.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_site_packages(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the JSON list printed by [`SITE_PACKAGES_SCRIPT`].
pub fn parse_site_packages(stdout: &str) -> Result<Vec<PathBuf>, PythonProbeError> {
    let dirs: Vec<String> = serde_json::from_str(stdout.trim())
        .map_err(|e| PythonProbeError::BadOutput(e.to_string()))?;
    Ok(dirs.into_iter().map(PathBuf::from).collect())
}

/// Site-packages of the first python on `PATH`, or empty if unavailable.
///
/// Failure here only means the framework tier is skipped, so it is logged
/// at debug level and swallowed.
pub fn discover_site_packages() -> Vec<PathBuf> {
    match find_python().and_then(|python| site_packages_of(&python)) {
        Ok(dirs) => dirs,
        Err(err) => {
            tracing::debug!("site-packages discovery skipped: {err}");
            Vec::new()
        }
    }
}
