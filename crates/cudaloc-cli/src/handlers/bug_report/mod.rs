//! Bug report handler.
//!
//! Dumps every CUDA shared library found in the usual install locations,
//! then the locator's own verdict and diagnostic log, in a format meant to
//! be pasted into an issue.

mod display;
mod search;

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use cudaloc_core::{
    DiagnosticLog, EnvironmentSnapshot, LocatorError, Locator, LogEntry, Platform,
    ResolvedLibrary, extract_candidate_paths,
};

use super::locator_config;
use crate::error::CliError;
use display::{header, section_body};
use search::find_cuda_libraries;

/// System-wide prefix scanned for stray toolkit installs.
const SYSTEM_PREFIX: &str = "/usr/local";

/// One directory tree to scan, with the title it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub root: PathBuf,
}

impl ReportSection {
    fn new(title: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            root: root.into(),
        }
    }
}

/// Where the report looks, gathered up front.
pub struct ReportInputs<'a> {
    pub snapshot: &'a EnvironmentSnapshot,
    pub platform: &'a Platform,
    pub framework_lib_dir: Option<&'a Path>,
    pub system_prefix: &'a Path,
    pub working_dir: Option<&'a Path>,
}

/// Decide which directory trees to scan, in report order.
///
/// Only existing directories make the list. `CUDA_PATH` is reported only
/// when `CUDA_HOME` is absent.
pub fn collect_sections(inputs: &ReportInputs<'_>) -> Vec<ReportSection> {
    let snapshot = inputs.snapshot;
    let mut sections = Vec::new();

    if let Some(prefix) = existing_dir(snapshot.get("CONDA_PREFIX")) {
        sections.push(ReportSection::new("ANACONDA CUDA PATHS", prefix));
    }

    if let Some(dir) = inputs.framework_lib_dir.filter(|d| d.is_dir()) {
        sections.push(ReportSection::new("PYTORCH CUDA PATHS", dir));
    }

    if let Some(home) = existing_dir(snapshot.get("CUDA_HOME")) {
        sections.push(ReportSection::new("CUDA_HOME CUDA PATHS", home));
    } else if let Some(path) = existing_dir(snapshot.get("CUDA_PATH")) {
        sections.push(ReportSection::new("CUDA_PATH CUDA PATHS", path));
    }

    if inputs.system_prefix.is_dir() {
        sections.push(ReportSection::new(
            format!("{} CUDA PATHS", inputs.system_prefix.display()),
            inputs.system_prefix,
        ));
    }

    if let Some(cwd) = inputs.working_dir.filter(|d| d.is_dir()) {
        sections.push(ReportSection::new("WORKING DIRECTORY CUDA PATHS", cwd));
    }

    if let Some(ld_path) = snapshot.get("LD_LIBRARY_PATH") {
        for dir in extract_candidate_paths(ld_path.trim(), inputs.platform) {
            if dir.is_dir() {
                sections.push(ReportSection::new(
                    format!("{} CUDA PATHS", dir.display()),
                    dir,
                ));
            }
        }
    }

    sections
}

fn existing_dir(value: Option<&str>) -> Option<PathBuf> {
    value.map(PathBuf::from).filter(|p| p.is_dir())
}

/// Execute the bug-report command.
pub fn execute() -> Result<()> {
    let snapshot = EnvironmentSnapshot::capture();
    let config = locator_config(&snapshot, None);
    let working_dir = env::current_dir().ok();

    let inputs = ReportInputs {
        snapshot: &snapshot,
        platform: &config.platform,
        framework_lib_dir: config.framework_lib_dir.as_deref(),
        system_prefix: Path::new(SYSTEM_PREFIX),
        working_dir: working_dir.as_deref(),
    };
    let sections = collect_sections(&inputs);
    let extension = config.platform.shared_lib_extension;

    let runtime_lib = config.runtime_lib_name().to_string();
    let log = DiagnosticLog::new();
    let resolved = Locator::new(config).resolve(&snapshot, &log);
    let other = render_other(&runtime_lib, &resolved, &log.entries());

    write_report(&mut io::stdout().lock(), &sections, extension, &other)?;
    Ok(())
}

/// Write the banner, one block per scanned section, then `other`.
///
/// Fails with [`CliError::Io`] when the output stream does.
pub fn write_report<W: Write>(
    out: &mut W,
    sections: &[ReportSection],
    extension: &str,
    other: &str,
) -> Result<(), CliError> {
    writeln!(out, "{}", header(""))?;
    writeln!(out, "{}", header("BUG REPORT INFORMATION"))?;
    writeln!(out, "{}", header(""))?;
    writeln!(out)?;

    for section in sections {
        tracing::debug!(root = %section.root.display(), "scanning");
        let outcome = find_cuda_libraries(&section.root, extension);
        writeln!(out, "{}", header(&section.title))?;
        write!(out, "{}", section_body(&outcome.matches, outcome.unreadable))?;
        writeln!(out)?;
    }

    write!(out, "{other}")?;
    out.flush()?;
    Ok(())
}

/// Render the OTHER section: the locator verdict and its log.
pub fn render_other(
    runtime_lib: &str,
    resolved: &Result<Option<ResolvedLibrary>, LocatorError>,
    log: &[LogEntry],
) -> String {
    let mut out = format!("{}\n", header("OTHER"));

    match resolved {
        Ok(Some(found)) => out.push_str(&format!(
            "CUDA_RUNTIME_LIB = {} (via {})\n",
            found.path.display(),
            found.source
        )),
        Ok(None) => out.push_str(&format!("CUDA_RUNTIME_LIB = {runtime_lib} not found\n")),
        Err(err) => out.push_str(&format!("CUDA_RUNTIME_LIB = lookup aborted: {err}\n")),
    }

    if !log.is_empty() {
        out.push_str("\nLocator log:\n");
        for entry in log {
            out.push_str(&format!("{entry}\n"));
        }
    }

    out.push_str(&format!("{}\n", header("")));
    out.push_str(&format!("{}\n", header("DEBUG INFO END")));
    out.push_str(&format!("{}\n", header("")));
    out.push_str("\nWARNING: Please be sure to sanitize sensitive info from any such env vars!\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::exit_code_for;
    use cudaloc_core::{LibrarySource, Severity};
    use std::fs;
    use tempfile::TempDir;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_report_lists_sections_then_other() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("libcudart.so"), b"").unwrap();
        let sections = [ReportSection::new("WORKING DIRECTORY CUDA PATHS", root.path())];

        let mut out = Vec::new();
        write_report(&mut out, &sections, ".so", "OTHER BLOCK\n").unwrap();
        let text = String::from_utf8(out).unwrap();

        let banner = text.find("BUG REPORT INFORMATION").unwrap();
        let section = text.find("WORKING DIRECTORY CUDA PATHS").unwrap();
        let lib = text.find("libcudart.so").unwrap();
        assert!(banner < section && section < lib);
        assert!(text.ends_with("OTHER BLOCK\n"));
    }

    #[test]
    fn test_write_report_to_closed_stream_is_io_error() {
        let err = write_report(&mut ClosedPipe, &[], ".so", "").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(exit_code_for(&anyhow::Error::new(err)), 74);
    }

    fn titles(sections: &[ReportSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_sections_follow_report_order() {
        let root = TempDir::new().unwrap();
        let conda = root.path().join("conda");
        let torch = root.path().join("torch/lib");
        let cuda_home = root.path().join("cuda");
        let cuda_path = root.path().join("cuda-win");
        let prefix = root.path().join("usr-local");
        let ld_a = root.path().join("ld-a");
        for dir in [&conda, &torch, &cuda_home, &cuda_path, &prefix, &ld_a] {
            fs::create_dir_all(dir).unwrap();
        }

        let ld_value = format!(
            "{}:{}",
            ld_a.display(),
            root.path().join("ld-missing").display()
        );
        let snapshot = EnvironmentSnapshot::from_pairs([
            ("CONDA_PREFIX", conda.display().to_string()),
            ("CUDA_HOME", cuda_home.display().to_string()),
            ("CUDA_PATH", cuda_path.display().to_string()),
            ("LD_LIBRARY_PATH", ld_value),
        ]);
        let platform = Platform::unix();

        let sections = collect_sections(&ReportInputs {
            snapshot: &snapshot,
            platform: &platform,
            framework_lib_dir: Some(torch.as_path()),
            system_prefix: &prefix,
            working_dir: Some(root.path()),
        });

        let expected_prefix = format!("{} CUDA PATHS", prefix.display());
        let expected_ld = format!("{} CUDA PATHS", ld_a.display());
        assert_eq!(
            titles(&sections),
            [
                "ANACONDA CUDA PATHS",
                "PYTORCH CUDA PATHS",
                "CUDA_HOME CUDA PATHS",
                expected_prefix.as_str(),
                "WORKING DIRECTORY CUDA PATHS",
                expected_ld.as_str(),
            ]
        );
    }

    #[test]
    fn test_cuda_path_used_without_cuda_home() {
        let root = TempDir::new().unwrap();
        let cuda_path = root.path().join("cuda-win");
        fs::create_dir_all(&cuda_path).unwrap();

        let snapshot =
            EnvironmentSnapshot::from_pairs([("CUDA_PATH", cuda_path.display().to_string())]);
        let platform = Platform::unix();
        let sections = collect_sections(&ReportInputs {
            snapshot: &snapshot,
            platform: &platform,
            framework_lib_dir: None,
            system_prefix: &root.path().join("no-prefix"),
            working_dir: None,
        });

        assert_eq!(titles(&sections), ["CUDA_PATH CUDA PATHS"]);
        assert_eq!(sections[0].root, cuda_path);
    }

    #[test]
    fn test_missing_dirs_produce_no_sections() {
        let snapshot = EnvironmentSnapshot::from_pairs([
            ("CONDA_PREFIX", "/definitely/not/conda"),
            ("CUDA_HOME", "/definitely/not/cuda"),
        ]);
        let platform = Platform::unix();
        let sections = collect_sections(&ReportInputs {
            snapshot: &snapshot,
            platform: &platform,
            framework_lib_dir: Some(Path::new("/definitely/not/torch")),
            system_prefix: Path::new("/definitely/not/usr/local"),
            working_dir: None,
        });

        assert!(sections.is_empty());
    }

    #[test]
    fn test_render_other_found() {
        let resolved = Ok(Some(ResolvedLibrary {
            path: PathBuf::from("/usr/local/cuda/lib64/libcudart.so"),
            source: LibrarySource::DefaultInstall,
        }));
        let log = [LogEntry {
            message: "Searching /usr/local/cuda/lib64...".to_string(),
            severity: Severity::Info,
        }];

        let text = render_other("libcudart.so", &resolved, &log);
        assert!(text.contains(
            "CUDA_RUNTIME_LIB = /usr/local/cuda/lib64/libcudart.so (via default install directory)"
        ));
        assert!(text.contains("Searching /usr/local/cuda/lib64..."));
        assert!(text.contains("DEBUG INFO END"));
        assert!(text.ends_with("from any such env vars!\n"));
    }

    #[test]
    fn test_render_other_not_found() {
        let text = render_other("libcudart.so", &Ok(None), &[]);
        assert!(text.contains("CUDA_RUNTIME_LIB = libcudart.so not found"));
        assert!(!text.contains("Locator log:"));
    }
}
