//! Path-list parsing and existence filtering.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::diagnostics::DiagnosticLog;
use crate::error::{LocatorError, LocatorResult, is_name_too_long};
use crate::fs::FsProbe;
use crate::platform::Platform;

/// Split a path list on the platform separator, dropping empty segments.
///
/// No filesystem access happens here.
pub fn extract_candidate_paths(raw: &str, platform: &Platform) -> BTreeSet<PathBuf> {
    raw.split(platform.path_list_separator)
        .filter(|segment| !segment.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Keep only the paths that exist.
///
/// A "name too long" error is treated as non-existent. Any other
/// filesystem error aborts with [`LocatorError::Filesystem`]. When some
/// paths are dropped, exactly one warning listing all of them is logged.
pub fn remove_non_existent_dirs(
    candidates: BTreeSet<PathBuf>,
    fs: &dyn FsProbe,
    log: &DiagnosticLog,
) -> LocatorResult<BTreeSet<PathBuf>> {
    let mut existent = BTreeSet::new();
    let mut missing = BTreeSet::new();

    for path in candidates {
        match fs.exists(&path) {
            Ok(true) => {
                existent.insert(path);
            }
            Ok(false) => {
                missing.insert(path);
            }
            Err(err) if is_name_too_long(&err) => {
                missing.insert(path);
            }
            Err(err) => return Err(LocatorError::filesystem(path, err)),
        }
    }

    if !missing.is_empty() {
        log.warn(format!(
            "The following directories listed in your path were found to be non-existent: {}",
            format_paths(&missing)
        ));
    }

    Ok(existent)
}

/// Parse `raw` and keep only the entries that exist.
pub fn resolve_paths_list(
    raw: &str,
    platform: &Platform,
    fs: &dyn FsProbe,
    log: &DiagnosticLog,
) -> LocatorResult<BTreeSet<PathBuf>> {
    remove_non_existent_dirs(extract_candidate_paths(raw, platform), fs, log)
}

/// Render a path set as `{a, b, c}` for log messages.
pub(crate) fn format_paths<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> String {
    let joined = paths
        .into_iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{joined}}}")
}
