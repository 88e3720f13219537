//! Framework-bundled library directory.
//!
//! PyTorch wheels ship their own CUDA runtime under `torch/lib`. The
//! locator only needs that one directory; discovering the interpreter's
//! site-packages list is the caller's job.

use std::path::{Path, PathBuf};

/// Package directory of the framework inside site-packages.
pub const FRAMEWORK_PACKAGE: &str = "torch";

/// Library folder inside the framework package.
pub const FRAMEWORK_LIB_SUBDIR: &str = "lib";

/// Pick the framework library directory from a site-packages list.
///
/// The first entry that is an actual `site-packages` directory wins
/// (Debian's `dist-packages` and bare prefixes are skipped).
pub fn framework_lib_dir<P: AsRef<Path>>(site_packages: &[P]) -> Option<PathBuf> {
    site_packages
        .iter()
        .map(AsRef::as_ref)
        .find(|dir| dir.to_string_lossy().contains("site-packages"))
        .map(|dir| dir.join(FRAMEWORK_PACKAGE).join(FRAMEWORK_LIB_SUBDIR))
}
