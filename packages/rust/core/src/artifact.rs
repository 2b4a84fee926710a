//! Output artifact generation: annotated header + compiled payload.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use listforge_shared::{ListforgeError, Result, RunSummary};

/// Everything stamped into the artifact header.
#[derive(Debug)]
pub struct ArtifactInfo<'a> {
    /// Human-readable list title.
    pub title: &'a str,
    /// Homepage URL, when known.
    pub homepage: Option<&'a str>,
    /// Expiry note for consumers.
    pub expires: &'a str,
    /// The full source list, in input order.
    pub sources: &'a [String],
    /// Fetch statistics for the run.
    pub summary: &'a RunSummary,
    /// Effective rule count of the compiled payload.
    pub rule_count: usize,
    /// Generation timestamp (also drives the version stamp).
    pub generated_at: DateTime<Utc>,
}

/// Count effective rules: non-blank lines that are not `!` or `#` comments.
pub fn count_rules(content: &[u8]) -> usize {
    String::from_utf8_lossy(content)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('!') && !line.starts_with('#'))
        .count()
}

/// Render the comment header prepended to the output artifact.
pub fn render_header(info: &ArtifactInfo) -> String {
    let mut header = String::new();

    header.push_str(&format!("# Title: {}\n", info.title));
    header.push_str(&format!(
        "# Version: {}\n",
        info.generated_at.format("%Y%m%d%H%M")
    ));
    header.push_str(&format!("# Generated: {}\n", info.generated_at.to_rfc3339()));
    header.push_str(&format!("# Expires: {}\n", info.expires));
    header.push_str(&format!(
        "# Total sources: {} (Success: {}, Failed: {})\n",
        info.summary.total,
        info.summary.success,
        info.summary.failed_count()
    ));
    header.push_str(&format!("# Total rules: {}\n", info.rule_count));
    if let Some(homepage) = info.homepage {
        header.push_str(&format!("# Homepage: {homepage}\n"));
    }
    header.push_str("#\n# Source URLs:\n");
    for url in info.sources {
        header.push_str(&format!("# - {url}\n"));
    }
    header.push_str("#\n");
    header.push_str(&"#".repeat(84));
    header.push_str("\n\n");

    header
}

/// Write the artifact into `dir/file_name`, creating `dir` as needed.
pub fn write_artifact(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ListforgeError::io(dir, e))?;

    let path = dir.join(file_name);
    std::fs::write(&path, content).map_err(|e| ListforgeError::io(&path, e))?;

    info!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(path)
}
