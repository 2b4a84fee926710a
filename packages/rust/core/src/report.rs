//! CI reporting: append run counters to the `GITHUB_ENV` file.

use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use listforge_shared::RunSummary;

/// Append the run counters to `GITHUB_ENV` when running under GitHub
/// Actions. A missing variable means a local run; write failures are
/// logged and swallowed — reporting must never fail the build.
pub fn publish_github_env(summary: &RunSummary, rule_count: usize) {
    let Ok(env_file) = std::env::var("GITHUB_ENV") else {
        return;
    };

    match append_counters(Path::new(&env_file), summary, rule_count) {
        Ok(()) => info!(env_file, "published counters to GITHUB_ENV"),
        Err(e) => warn!(env_file, error = %e, "could not write GITHUB_ENV"),
    }
}

/// Append `KEY=value` counter lines, in fixed order.
pub fn append_counters(
    path: &Path,
    summary: &RunSummary,
    rule_count: usize,
) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    writeln!(file, "RULES_COUNT={rule_count}")?;
    writeln!(file, "SUCCESS_COUNT={}", summary.success)?;
    writeln!(file, "FAILED_COUNT={}", summary.failed_count())?;
    writeln!(file, "TOTAL_COUNT={}", summary.total)?;

    Ok(())
}
