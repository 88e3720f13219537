//! Runtime library matching inside candidate directories.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::LocatorConfig;
use crate::diagnostics::DiagnosticLog;
use crate::error::{LocatorError, LocatorResult, is_name_too_long};
use crate::fs::FsProbe;
use crate::pathset::{format_paths, resolve_paths_list};

/// Find the runtime library in every existing directory of a path list.
///
/// Returns full file paths (`<dir>/<runtime lib>`), never directories.
/// A "name too long" error on a candidate counts as no match; any other
/// filesystem error aborts with [`LocatorError::Filesystem`].
pub fn find_library_in(
    raw: &str,
    config: &LocatorConfig,
    fs: &dyn FsProbe,
    log: &DiagnosticLog,
) -> LocatorResult<BTreeSet<PathBuf>> {
    let lib_name = config.runtime_lib_name();
    let dirs = resolve_paths_list(raw, &config.platform, fs, log)?;

    let mut found = BTreeSet::new();
    for dir in dirs {
        let candidate = dir.join(lib_name);
        match fs.is_file(&candidate) {
            Ok(true) => {
                found.insert(candidate);
            }
            Ok(false) => {}
            Err(err) if is_name_too_long(&err) => {}
            Err(err) => return Err(LocatorError::filesystem(candidate, err)),
        }
    }
    Ok(found)
}

/// Warn when more than one runtime library was found.
///
/// The caller still picks one; this only leaves a trail for whoever has
/// to untangle the environment later.
pub fn warn_on_duplicates(
    matches: &BTreeSet<PathBuf>,
    config: &LocatorConfig,
    log: &DiagnosticLog,
) {
    if matches.len() <= 1 {
        return;
    }

    let lib_name = config.runtime_lib_name();
    log.warn(format!(
        "Found duplicate {lib_name} files: {}.. \
         We'll flip a coin and try one of these, in order to fail forward.\n\
         Either way, this might cause trouble in the future:\n\
         If you get `CUDA error: invalid device function` errors, the above \
         might be the cause and the solution is to make sure only one \
         {lib_name} in the paths that we search based on your env.",
        format_paths(matches)
    ));
}
