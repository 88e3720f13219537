//! End-to-end lookups against real directory trees.
//!
//! Each test builds a throwaway tree under a temp dir and points a fresh
//! environment snapshot at it, so nothing depends on what the host has
//! installed.

use std::fs;
use std::path::{Path, PathBuf};

use cudaloc_core::{
    DiagnosticLog, EnvironmentSnapshot, LibrarySource, Locator, LocatorConfig, Platform, Severity,
};
use tempfile::TempDir;

const LIB: &str = "libcudart.so";

fn touch_lib(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let lib = dir.join(LIB);
    fs::write(&lib, b"\x7fELF").unwrap();
    lib
}

fn config_with_default(default_dir: &Path) -> LocatorConfig {
    LocatorConfig::new(Platform::unix()).with_default_install_dir(default_dir)
}

fn s(path: &Path) -> String {
    path.display().to_string()
}

fn count_containing(log: &DiagnosticLog, needle: &str) -> usize {
    log.entries()
        .iter()
        .filter(|e| e.message.contains(needle))
        .count()
}

#[test]
fn conda_bin_match_logs_nothing() {
    let root = TempDir::new().unwrap();
    let conda = root.path().join("conda");
    let lib = touch_lib(&conda.join("bin"));

    let snapshot = EnvironmentSnapshot::from_pairs([("CONDA_PREFIX", s(&conda))]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("default")))
        .resolve(&snapshot, &log)
        .unwrap()
        .expect("library in conda bin");

    assert_eq!(found.path, lib);
    assert_eq!(found.source, LibrarySource::CondaPrefix);
    assert!(log.warnings().is_empty(), "{:?}", log.entries());
}

#[test]
fn empty_conda_falls_through_to_cuda_home() {
    let root = TempDir::new().unwrap();
    let conda = root.path().join("conda");
    fs::create_dir_all(conda.join("bin")).unwrap();
    fs::create_dir_all(conda.join("lib")).unwrap();
    let cuda = root.path().join("cuda");
    let lib = touch_lib(&cuda.join("lib"));

    let snapshot = EnvironmentSnapshot::from_pairs([
        ("CONDA_PREFIX", s(&conda)),
        ("CUDA_HOME", s(&cuda)),
    ]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("default")))
        .resolve(&snapshot, &log)
        .unwrap()
        .expect("library under CUDA_HOME/lib");

    assert_eq!(found.path, lib);
    assert_eq!(found.source, LibrarySource::CudaHome);
    assert_eq!(count_containing(&log, "did not contain"), 1);

    let fallthrough = log
        .entries()
        .into_iter()
        .find(|e| e.message.contains("did not contain"))
        .unwrap();
    assert!(fallthrough.message.contains(&s(&conda)));
}

#[test]
fn remaining_vars_are_pooled_with_one_duplicate_warning() {
    let root = TempDir::new().unwrap();
    let first = touch_lib(&root.path().join("toolkit-a/lib64"));
    let second = touch_lib(&root.path().join("toolkit-b/lib64"));

    let snapshot = EnvironmentSnapshot::from_pairs([
        ("MY_CUDA_LIBS", s(first.parent().unwrap())),
        ("OTHER_CUDA_LIBS", s(second.parent().unwrap())),
    ]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("default")))
        .resolve(&snapshot, &log)
        .unwrap()
        .expect("one of the pooled libraries");

    assert!(found.path == first || found.path == second);
    assert!(matches!(found.source, LibrarySource::EnvVar(_)));

    let duplicates: Vec<_> = log
        .warnings()
        .into_iter()
        .filter(|e| e.message.contains("duplicate"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].message.contains(&s(&first)));
    assert!(duplicates[0].message.contains(&s(&second)));
}

#[test]
fn pooled_choice_is_stable_across_runs() {
    let root = TempDir::new().unwrap();
    let a = touch_lib(&root.path().join("a"));
    let b = touch_lib(&root.path().join("b"));

    let snapshot = EnvironmentSnapshot::from_pairs([
        ("ZZZ_LIBS", s(a.parent().unwrap())),
        ("AAA_LIBS", s(b.parent().unwrap())),
    ]);
    let locator = Locator::new(config_with_default(&root.path().join("default")));

    let first = locator.resolve(&snapshot, &DiagnosticLog::new()).unwrap();
    let second = locator.resolve(&snapshot, &DiagnosticLog::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_env_and_missing_default_is_not_found() {
    let root = TempDir::new().unwrap();

    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("nowhere")))
        .resolve(&EnvironmentSnapshot::default(), &log)
        .unwrap();

    assert!(found.is_none());
    assert!(!log.warnings().is_empty());
}

#[test]
fn empty_env_and_default_without_library_is_not_found() {
    let root = TempDir::new().unwrap();
    let default_dir = root.path().join("lib64");
    fs::create_dir_all(&default_dir).unwrap();

    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&default_dir))
        .resolve(&EnvironmentSnapshot::default(), &log)
        .unwrap();

    assert!(found.is_none());
    assert!(!log.warnings().is_empty());
}

#[test]
fn empty_env_uses_default_install_dir() {
    let root = TempDir::new().unwrap();
    let default_dir = root.path().join("cuda/lib64");
    let lib = touch_lib(&default_dir);

    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&default_dir))
        .resolve(&EnvironmentSnapshot::default(), &log)
        .unwrap()
        .expect("library in default dir");

    assert_eq!(found.path, lib);
    assert_eq!(found.source, LibrarySource::DefaultInstall);

    let entries = log.entries();
    assert!(!entries.is_empty());
    assert_eq!(entries[0].severity, Severity::Info);
    assert!(entries[0].message.contains("Searching"));
    assert!(entries[0].message.contains(&s(&default_dir)));
}

#[test]
fn default_dir_is_skipped_when_pool_has_matches() {
    let root = TempDir::new().unwrap();
    let from_env = touch_lib(&root.path().join("env-libs"));
    let default_dir = root.path().join("default");
    touch_lib(&default_dir);

    let snapshot =
        EnvironmentSnapshot::from_pairs([("EXTRA_LIBS", s(from_env.parent().unwrap()))]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&default_dir))
        .resolve(&snapshot, &log)
        .unwrap()
        .unwrap();

    assert_eq!(found.path, from_env);
    assert_eq!(count_containing(&log, "Searching"), 0);
    assert!(log.warnings().is_empty());
}

#[test]
fn ld_library_path_match_does_not_warn() {
    let root = TempDir::new().unwrap();
    let lib = touch_lib(&root.path().join("ld"));
    let ld_path = format!("{}:{}", s(&root.path().join("missing")), s(lib.parent().unwrap()));

    let snapshot = EnvironmentSnapshot::from_pairs([("LD_LIBRARY_PATH", ld_path)]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("default")))
        .resolve(&snapshot, &log)
        .unwrap()
        .unwrap();

    assert_eq!(found.path, lib);
    assert_eq!(found.source, LibrarySource::LdLibraryPath);
    assert_eq!(count_containing(&log, "did not contain"), 0);
    // Only the missing LD_LIBRARY_PATH entry is reported.
    assert_eq!(log.warnings().len(), 1);
}

#[test]
fn framework_dir_beats_toolkit_vars() {
    let root = TempDir::new().unwrap();
    let torch_lib = touch_lib(&root.path().join("site-packages/torch/lib"));
    let cuda = root.path().join("cuda");
    touch_lib(&cuda.join("bin"));

    let snapshot = EnvironmentSnapshot::from_pairs([("CUDA_HOME", s(&cuda))]);
    let config = config_with_default(&root.path().join("default"))
        .with_framework_lib_dir(torch_lib.parent().unwrap());

    let log = DiagnosticLog::new();
    let found = Locator::new(config).resolve(&snapshot, &log).unwrap().unwrap();

    assert_eq!(found.path, torch_lib);
    assert_eq!(found.source, LibrarySource::FrameworkBundle);
}

#[test]
fn ignored_and_scalar_vars_are_never_scanned() {
    let root = TempDir::new().unwrap();
    let home_lib = touch_lib(&root.path().join("home"));

    let snapshot = EnvironmentSnapshot::from_pairs([
        ("HOME", s(home_lib.parent().unwrap())),
        ("CUDA_VISIBLE_DEVICES", "0".to_string()),
    ]);
    let log = DiagnosticLog::new();
    let found = Locator::new(config_with_default(&root.path().join("default")))
        .resolve(&snapshot, &log)
        .unwrap();

    assert!(found.is_none());
}
