//! Recursive search for CUDA shared libraries.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Files found under one root.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<PathBuf>,
    /// Entries that could not be read (permissions, races with deletion).
    pub unreadable: usize,
}

/// Whether a file name looks like `*cuda*<ext>`.
pub fn is_cuda_library_name(name: &str, extension: &str) -> bool {
    name.strip_suffix(extension)
        .is_some_and(|stem| stem.contains("cuda"))
}

/// Walk `root` and collect every `*cuda*<ext>` file, sorted.
///
/// Symlinks are not followed, so loops in the tree cannot hang the walk.
pub fn find_cuda_libraries(root: &Path, extension: &str) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();

    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                let is_match = !entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| is_cuda_library_name(name, extension));
                if is_match {
                    outcome.matches.push(entry.into_path());
                }
            }
            Err(err) => {
                tracing::debug!("skipping unreadable entry: {err}");
                outcome.unreadable += 1;
            }
        }
    }

    outcome.matches.sort();
    outcome
}
