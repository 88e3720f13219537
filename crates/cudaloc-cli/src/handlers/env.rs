//! Env command handler: which variables the locator will scan.

use anyhow::Result;

use cudaloc_core::{EnvironmentSnapshot, IGNORED_ENV_VARS, Platform, candidate_env_vars};

/// Execute the env command.
pub fn execute() -> Result<()> {
    let snapshot = EnvironmentSnapshot::capture();
    print!("{}", render(&snapshot, &Platform::detect(&snapshot)));
    Ok(())
}

/// Render the candidate variables and the ignore list.
pub fn render(snapshot: &EnvironmentSnapshot, platform: &Platform) -> String {
    let candidates = candidate_env_vars(snapshot, platform);
    let mut out = String::from("Candidate environment variables:\n");

    if candidates.is_empty() {
        out.push_str("  (none)\n");
    }
    for (name, value) in &candidates {
        out.push_str(&format!("  {name}={value}\n"));
    }

    out.push_str("\nIgnored by name:\n");
    out.push_str(&format!("  {}\n", IGNORED_ENV_VARS.join(", ")));
    out
}
