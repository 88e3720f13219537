//! Environment snapshot and the candidate-variable filter.
//!
//! A lookup reads the environment exactly once, into an
//! [`EnvironmentSnapshot`], and works from that copy. Mutating the process
//! environment mid-lookup therefore cannot change the outcome.

use std::collections::BTreeMap;
use std::env;

use crate::platform::Platform;

/// Variables known never to point at CUDA libraries.
///
/// Shell bookkeeping, session and desktop plumbing. `PATH` is not listed:
/// it has its own resolution tier.
pub const IGNORED_ENV_VARS: &[&str] = &[
    "PWD",
    "OLDPWD",
    "SSH_AUTH_SOCK",
    "SSH_TTY",
    "HOME",
    "TMUX",
    "XDG_DATA_DIRS",
    "XDG_GREETER_DATA_DIR",
    "XDG_RUNTIME_DIR",
    "MAIL",
    "SHELL",
    "DBUS_SESSION_BUS_ADDRESS",
    "LESSOPEN",
    "LESSCLOSE",
    "_",
];

/// Prefix of the locator's own configuration variables, never scanned.
pub const OWN_VAR_PREFIX: &str = "CUDALOC_";

/// Immutable name -> value view of the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvironmentSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn capture() -> Self {
        Self {
            vars: env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Heuristic: a value that contains no directory separator is a scalar
/// (a locale, a flag, a number) and cannot be a library search path.
pub fn looks_like_path_list(value: &str, platform: &Platform) -> bool {
    platform.has_dir_separator(value)
}

/// Whether a variable name is excluded from scanning.
pub fn is_ignored_env_var(name: &str) -> bool {
    IGNORED_ENV_VARS.contains(&name) || name.starts_with(OWN_VAR_PREFIX)
}

/// Collect the variables that might hold CUDA library paths.
///
/// Drops names on the ignore list and values that fail
/// [`looks_like_path_list`].
pub fn candidate_env_vars(
    snapshot: &EnvironmentSnapshot,
    platform: &Platform,
) -> BTreeMap<String, String> {
    snapshot
        .iter()
        .filter(|(name, _)| !is_ignored_env_var(name))
        .filter(|(_, value)| looks_like_path_list(value, platform))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
