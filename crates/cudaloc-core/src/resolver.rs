//! Tiered resolution of the CUDA runtime library.
//!
//! Searches for the runtime library in the following order of priority:
//! 1. Active conda environment (`CONDA_PREFIX`, `bin` then `lib`)
//! 2. Library folder bundled with the framework install (`torch/lib`)
//! 3. `CUDA_PATH` (Windows toolkit, `bin` then `lib`)
//! 4. `CUDA_HOME` (Unix toolkit, `bin` then `lib`)
//! 5. `LD_LIBRARY_PATH`
//! 6. `PATH`
//! 7. Every other candidate environment variable, pooled
//! 8. The platform default install directory, only if 7 found nothing
//!
//! Tiers 1-6 are high-confidence signals: the first one to produce a match
//! wins and nothing after it is probed. Tiers 7-8 are a best-effort scan
//! whose matches cannot be ranked, so they are pooled and one is picked
//! after a duplicate warning.
//!
//! The tier list is plain data ([`Tier`]); [`Locator::with_tiers`] accepts
//! any order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::LocatorConfig;
use crate::diagnostics::DiagnosticLog;
use crate::env::{EnvironmentSnapshot, candidate_env_vars};
use crate::error::LocatorResult;
use crate::fs::{FsProbe, StdFsProbe};
use crate::matcher::{find_library_in, warn_on_duplicates};

/// Active conda-style environment prefix.
pub const CONDA_PREFIX_VAR: &str = "CONDA_PREFIX";
/// Windows CUDA toolkit root.
pub const CUDA_PATH_VAR: &str = "CUDA_PATH";
/// Unix CUDA toolkit root.
pub const CUDA_HOME_VAR: &str = "CUDA_HOME";
/// Dynamic loader search path.
pub const LD_LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";
/// Executable search path (also the DLL search path on Windows).
pub const PATH_VAR: &str = "PATH";

/// Sub-directories of a toolkit or environment root, in probe order.
const ROOT_SUBDIRS: [&str; 2] = ["bin", "lib"];

/// Where a resolved library was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LibrarySource {
    CondaPrefix,
    FrameworkBundle,
    CudaPath,
    CudaHome,
    LdLibraryPath,
    SearchPath,
    /// Any other environment variable, by name.
    EnvVar(String),
    DefaultInstall,
}

impl fmt::Display for LibrarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CondaPrefix => f.write_str(CONDA_PREFIX_VAR),
            Self::FrameworkBundle => f.write_str("framework bundle"),
            Self::CudaPath => f.write_str(CUDA_PATH_VAR),
            Self::CudaHome => f.write_str(CUDA_HOME_VAR),
            Self::LdLibraryPath => f.write_str(LD_LIBRARY_PATH_VAR),
            Self::SearchPath => f.write_str(PATH_VAR),
            Self::EnvVar(name) => f.write_str(name),
            Self::DefaultInstall => f.write_str("default install directory"),
        }
    }
}

/// The runtime library chosen by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLibrary {
    pub path: PathBuf,
    pub source: LibrarySource,
}

/// How a tier's matches affect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// First match returns immediately; later tiers are never probed.
    ShortCircuit,
    /// Matches are added to a shared pool.
    Pool,
    /// Probed only when the pool is still empty, then pooled.
    Fallback,
}

/// What a tier probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// `<var>/bin`, then `<var>/lib`.
    EnvRoot(&'static str),
    /// The configured framework library directory.
    FrameworkDir,
    /// The variable's value as a path list.
    EnvPathList(&'static str),
    /// Every candidate variable not consumed by another tier.
    RemainingEnvVars,
    /// The platform default install directory.
    DefaultInstallDir,
}

impl Probe {
    /// The environment variable this probe consumes, if any.
    pub fn env_var(self) -> Option<&'static str> {
        match self {
            Self::EnvRoot(name) | Self::EnvPathList(name) => Some(name),
            Self::FrameworkDir | Self::RemainingEnvVars | Self::DefaultInstallDir => None,
        }
    }
}

/// One prioritized step of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub kind: TierKind,
    pub probe: Probe,
}

impl Tier {
    pub const fn short_circuit(probe: Probe) -> Self {
        Self {
            kind: TierKind::ShortCircuit,
            probe,
        }
    }

    pub const fn pool(probe: Probe) -> Self {
        Self {
            kind: TierKind::Pool,
            probe,
        }
    }

    pub const fn fallback(probe: Probe) -> Self {
        Self {
            kind: TierKind::Fallback,
            probe,
        }
    }
}

/// The standard search order.
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::short_circuit(Probe::EnvRoot(CONDA_PREFIX_VAR)),
        Tier::short_circuit(Probe::FrameworkDir),
        Tier::short_circuit(Probe::EnvRoot(CUDA_PATH_VAR)),
        Tier::short_circuit(Probe::EnvRoot(CUDA_HOME_VAR)),
        Tier::short_circuit(Probe::EnvPathList(LD_LIBRARY_PATH_VAR)),
        Tier::short_circuit(Probe::EnvPathList(PATH_VAR)),
        Tier::pool(Probe::RemainingEnvVars),
        Tier::fallback(Probe::DefaultInstallDir),
    ]
}

/// A path list to hand to the matcher, tagged with where it came from.
struct Target {
    raw: String,
    source: LibrarySource,
}

/// The concrete targets of a tier whose signal is present.
struct Expansion {
    /// Human-readable origin, used in "did not contain" messages.
    origin: String,
    targets: Vec<Target>,
}

/// Runtime library locator.
///
/// Holds no state between lookups; every call to [`Locator::resolve`]
/// works from the snapshot it is given.
pub struct Locator<F = StdFsProbe> {
    config: LocatorConfig,
    fs: F,
    tiers: Vec<Tier>,
}

impl Locator<StdFsProbe> {
    /// Locator over the real filesystem with the default tiers.
    pub fn new(config: LocatorConfig) -> Self {
        Self::with_fs(config, StdFsProbe::new())
    }
}

impl<F: FsProbe> Locator<F> {
    /// Locator over an injected filesystem probe.
    pub fn with_fs(config: LocatorConfig, fs: F) -> Self {
        Self {
            config,
            fs,
            tiers: default_tiers(),
        }
    }

    /// Replace the tier order.
    #[must_use]
    pub fn with_tiers(mut self, tiers: Vec<Tier>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Find the runtime library the process should load.
    ///
    /// Returns `Ok(None)` when nothing matched anywhere; that is not an
    /// error here, the caller decides how serious it is. Only unexpected
    /// filesystem failures return `Err`.
    pub fn resolve(
        &self,
        snapshot: &EnvironmentSnapshot,
        log: &DiagnosticLog,
    ) -> LocatorResult<Option<ResolvedLibrary>> {
        let candidates = candidate_env_vars(snapshot, &self.config.platform);
        let consumed: BTreeSet<&str> = self
            .tiers
            .iter()
            .filter_map(|tier| tier.probe.env_var())
            .collect();

        let mut pool: BTreeMap<PathBuf, LibrarySource> = BTreeMap::new();

        for tier in &self.tiers {
            tracing::debug!(kind = ?tier.kind, probe = ?tier.probe, "probing tier");

            match tier.kind {
                TierKind::ShortCircuit => {
                    let Some(expansion) = self.expand(tier.probe, &candidates, &consumed) else {
                        continue;
                    };
                    if let Some(found) = self.first_match(&expansion, log)? {
                        tracing::debug!(
                            path = %found.path.display(),
                            source = %found.source,
                            "resolved"
                        );
                        return Ok(Some(found));
                    }
                    log.warn(format!(
                        "{} did not contain {} as expected! Searching further paths...",
                        expansion.origin,
                        self.config.runtime_lib_name()
                    ));
                }
                TierKind::Pool => {
                    if let Some(expansion) = self.expand(tier.probe, &candidates, &consumed) {
                        self.extend_pool(&mut pool, expansion, log)?;
                    }
                }
                TierKind::Fallback => {
                    if !pool.is_empty() {
                        continue;
                    }
                    if let Some(expansion) = self.expand(tier.probe, &candidates, &consumed) {
                        log.info(format!(
                            "{} not found in any environmental path. Searching {}...",
                            self.config.runtime_lib_name(),
                            expansion.origin
                        ));
                        self.extend_pool(&mut pool, expansion, log)?;
                    }
                }
            }
        }

        let matches: BTreeSet<PathBuf> = pool.keys().cloned().collect();
        warn_on_duplicates(&matches, &self.config, log);

        if let Some((path, source)) = pool.into_iter().next() {
            tracing::debug!(path = %path.display(), %source, "resolved from pooled matches");
            return Ok(Some(ResolvedLibrary { path, source }));
        }

        log.warn(format!(
            "{} was not found in any searched location.",
            self.config.runtime_lib_name()
        ));
        Ok(None)
    }

    /// Probe targets in order and return the first match.
    fn first_match(
        &self,
        expansion: &Expansion,
        log: &DiagnosticLog,
    ) -> LocatorResult<Option<ResolvedLibrary>> {
        for target in &expansion.targets {
            let matches = find_library_in(&target.raw, &self.config, &self.fs, log)?;
            warn_on_duplicates(&matches, &self.config, log);

            if let Some(path) = matches.into_iter().next() {
                return Ok(Some(ResolvedLibrary {
                    path,
                    source: target.source.clone(),
                }));
            }
        }
        Ok(None)
    }

    fn extend_pool(
        &self,
        pool: &mut BTreeMap<PathBuf, LibrarySource>,
        expansion: Expansion,
        log: &DiagnosticLog,
    ) -> LocatorResult<()> {
        for target in expansion.targets {
            for path in find_library_in(&target.raw, &self.config, &self.fs, log)? {
                pool.entry(path).or_insert_with(|| target.source.clone());
            }
        }
        Ok(())
    }

    /// Turn a probe into concrete targets, or `None` when its signal is absent.
    fn expand(
        &self,
        probe: Probe,
        candidates: &BTreeMap<String, String>,
        consumed: &BTreeSet<&str>,
    ) -> Option<Expansion> {
        match probe {
            Probe::EnvRoot(name) => {
                let root = Path::new(candidates.get(name)?);
                let source = source_for_var(name);
                Some(Expansion {
                    origin: root.display().to_string(),
                    targets: ROOT_SUBDIRS
                        .iter()
                        .map(|sub| Target {
                            raw: root.join(sub).to_string_lossy().into_owned(),
                            source: source.clone(),
                        })
                        .collect(),
                })
            }
            Probe::EnvPathList(name) => {
                let value = candidates.get(name)?;
                Some(Expansion {
                    origin: value.clone(),
                    targets: vec![Target {
                        raw: value.clone(),
                        source: source_for_var(name),
                    }],
                })
            }
            Probe::FrameworkDir => {
                let dir = self.config.framework_lib_dir.as_ref()?;
                Some(Expansion {
                    origin: dir.display().to_string(),
                    targets: vec![Target {
                        raw: dir.to_string_lossy().into_owned(),
                        source: LibrarySource::FrameworkBundle,
                    }],
                })
            }
            Probe::RemainingEnvVars => Some(Expansion {
                origin: "remaining environment variables".to_string(),
                targets: candidates
                    .iter()
                    .filter(|(name, _)| !consumed.contains(name.as_str()))
                    .map(|(name, value)| Target {
                        raw: value.clone(),
                        source: LibrarySource::EnvVar(name.clone()),
                    })
                    .collect(),
            }),
            Probe::DefaultInstallDir => {
                let dir = self.config.default_install_dir();
                Some(Expansion {
                    origin: dir.display().to_string(),
                    targets: vec![Target {
                        raw: dir.to_string_lossy().into_owned(),
                        source: LibrarySource::DefaultInstall,
                    }],
                })
            }
        }
    }
}

fn source_for_var(name: &str) -> LibrarySource {
    match name {
        CONDA_PREFIX_VAR => LibrarySource::CondaPrefix,
        CUDA_PATH_VAR => LibrarySource::CudaPath,
        CUDA_HOME_VAR => LibrarySource::CudaHome,
        LD_LIBRARY_PATH_VAR => LibrarySource::LdLibraryPath,
        PATH_VAR => LibrarySource::SearchPath,
        other => LibrarySource::EnvVar(other.to_string()),
    }
}
