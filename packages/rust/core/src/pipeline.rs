//! End-to-end `build` pipeline: source list → fetch → merge → compile →
//! annotated artifact + CI counters.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use listforge_fetch::fetch_all_with;
use listforge_shared::{
    CompilerConfig, FetchConfig, ListConfig, ListforgeError, Result, RunSummary,
};

use crate::artifact::{self, ArtifactInfo};
use crate::{compiler, merge, report, sources};

/// Configuration for one `build` run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Plain-text file listing source URLs.
    pub sources_file: PathBuf,
    /// Directory for the primary artifact.
    pub output_dir: PathBuf,
    /// Directory the artifact is copied to for publishing.
    pub publish_dir: PathBuf,
    /// Artifact file name.
    pub file_name: String,
    /// Download pool settings.
    pub fetch: FetchConfig,
    /// Minimum acceptable success percentage (0 disables the check).
    pub min_success_percent: u8,
    /// External compiler settings.
    pub compiler: CompilerConfig,
    /// Published list metadata.
    pub list: ListConfig,
}

/// Result of a completed `build` run.
#[derive(Debug)]
pub struct BuildResult {
    /// Path of the primary artifact.
    pub output_path: PathBuf,
    /// Path of the published copy.
    pub publish_path: PathBuf,
    /// Fetch statistics.
    pub summary: RunSummary,
    /// Effective rule count of the final artifact.
    pub rule_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// What a `build` invocation amounted to.
#[derive(Debug)]
pub enum BuildOutcome {
    /// Artifacts were written.
    Built(BuildResult),
    /// The source list was empty; nothing was fetched or written.
    NothingToDo,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called as each source download completes.
    fn source_fetched(&self, url: &str, ok: bool, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_fetched(&self, _url: &str, _ok: bool, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build pipeline.
///
/// 1. Read and filter the source list
/// 2. Download all sources through the bounded pool
/// 3. Merge successes in source order, derive the run summary
/// 4. Compile via the external tool (or pass through)
/// 5. Prepend the annotated header, write output + publish copies
/// 6. Publish counters to `GITHUB_ENV` when present
#[instrument(skip_all, fields(sources = %config.sources_file.display()))]
pub async fn build(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildOutcome> {
    let start = Instant::now();

    // --- Phase 1: Source list ---
    progress.phase("Reading source list");
    let urls = sources::read_sources(&config.sources_file)?;

    if urls.is_empty() {
        info!("source list is empty, nothing to do");
        return Ok(BuildOutcome::NothingToDo);
    }

    // --- Phase 2: Download ---
    progress.phase("Downloading sources");
    let client = listforge_fetch::build_client(&config.fetch)?;
    let outcomes = fetch_all_with(
        &client,
        &urls,
        config.fetch.concurrency,
        |outcome, current, total| {
            if let Err(e) = &outcome.result {
                warn!(url = %outcome.url, error = %e, "download failed");
            }
            progress.source_fetched(&outcome.url, outcome.is_success(), current, total);
        },
    )
    .await;

    // --- Phase 3: Merge ---
    progress.phase("Merging downloaded rules");
    let aggregate = merge::aggregate(&urls, outcomes)?;
    let summary = aggregate.summary.clone();

    info!(
        total = summary.total,
        success = summary.success,
        failed = summary.failed_count(),
        "download summary"
    );

    if config.min_success_percent > 0 && summary.success_percent() < config.min_success_percent {
        return Err(ListforgeError::BelowSuccessThreshold {
            success: summary.success,
            total: summary.total,
            min_percent: config.min_success_percent,
        });
    }

    // --- Phase 4: Compile ---
    let compiled = if config.compiler.enabled {
        progress.phase("Compiling rules");
        let work_dir = tempfile::tempdir()
            .map_err(|e| ListforgeError::io(std::env::temp_dir(), e))?;
        let merged_path = work_dir.path().join("merged_rules.txt");
        let compiled_path = work_dir.path().join("compiled_rules.txt");

        std::fs::write(&merged_path, &aggregate.payload)
            .map_err(|e| ListforgeError::io(&merged_path, e))?;

        compiler::compile(&config.compiler.command, &merged_path, &compiled_path).await?;

        std::fs::read(&compiled_path).map_err(|e| ListforgeError::io(&compiled_path, e))?
    } else {
        aggregate.payload
    };

    // --- Phase 5: Artifacts ---
    progress.phase("Writing artifacts");
    let rule_count = artifact::count_rules(&compiled);
    let homepage = resolve_homepage(&config.list);

    let header = artifact::render_header(&ArtifactInfo {
        title: &config.list.title,
        homepage: homepage.as_deref(),
        expires: &config.list.expires,
        sources: &urls,
        summary: &summary,
        rule_count,
        generated_at: Utc::now(),
    });

    let mut content = header.into_bytes();
    content.extend_from_slice(&compiled);

    let output_path = artifact::write_artifact(&config.output_dir, &config.file_name, &content)?;
    let publish_path = artifact::write_artifact(&config.publish_dir, &config.file_name, &content)?;

    // --- Phase 6: CI counters ---
    report::publish_github_env(&summary, rule_count);

    let result = BuildResult {
        output_path,
        publish_path,
        summary,
        rule_count,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        rule_count = result.rule_count,
        output = %result.output_path.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "build pipeline complete"
    );

    Ok(BuildOutcome::Built(result))
}

/// Homepage for the header: explicit config, else derived from the
/// `GITHUB_REPOSITORY` slug Actions provides.
fn resolve_homepage(list: &ListConfig) -> Option<String> {
    list.homepage.clone().or_else(|| {
        std::env::var("GITHUB_REPOSITORY")
            .ok()
            .filter(|repo| !repo.is_empty())
            .map(|repo| format!("https://github.com/{repo}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(dir: &std::path::Path, sources_file: PathBuf) -> BuildConfig {
        BuildConfig {
            sources_file,
            output_dir: dir.join("rules"),
            publish_dir: dir.join("publish"),
            file_name: "output.txt".into(),
            fetch: FetchConfig {
                concurrency: 4,
                timeout: Duration::from_secs(5),
            },
            min_success_percent: 0,
            compiler: CompilerConfig {
                command: "hostlist-compiler".into(),
                enabled: false,
            },
            list: ListConfig {
                title: "Test rules".into(),
                homepage: Some("https://github.com/example/rules".into()),
                expires: "12 hours".into(),
            },
        }
    }

    #[tokio::test]
    async fn builds_artifact_from_mixed_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("||a.example^"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/c.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("||c.example^"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let sources_file = dir.path().join("rules.txt");
        std::fs::write(
            &sources_file,
            format!(
                "# sources\n{0}/a.txt\n{0}/b.txt\n{0}/c.txt\n",
                server.uri()
            ),
        )
        .expect("write sources");

        let config = test_config(dir.path(), sources_file);
        let outcome = build(&config, &SilentProgress).await.expect("build");

        let BuildOutcome::Built(result) = outcome else {
            panic!("expected a built artifact");
        };
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.success, 2);
        assert_eq!(result.summary.failed, vec![format!("{}/b.txt", server.uri())]);
        assert_eq!(result.rule_count, 2);

        let content = std::fs::read_to_string(&result.output_path).expect("read artifact");
        assert!(content.starts_with("# Title: Test rules\n"));
        assert!(content.contains("# Total sources: 3 (Success: 2, Failed: 1)\n"));
        // Merged body in source order, failed source skipped without a gap.
        assert!(content.ends_with("||a.example^\n||c.example^"));

        let published = std::fs::read_to_string(&result.publish_path).expect("read publish copy");
        assert_eq!(content, published);
    }

    #[tokio::test]
    async fn empty_source_list_is_nothing_to_do() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sources_file = dir.path().join("rules.txt");
        std::fs::write(&sources_file, "# comments only\n\n").expect("write sources");

        let config = test_config(dir.path(), sources_file);
        let outcome = build(&config, &SilentProgress).await.expect("build");

        assert!(matches!(outcome, BuildOutcome::NothingToDo));
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn total_failure_fails_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dead.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let sources_file = dir.path().join("rules.txt");
        std::fs::write(&sources_file, format!("{}/dead.txt\n", server.uri()))
            .expect("write sources");

        let config = test_config(dir.path(), sources_file);
        let err = build(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(err, ListforgeError::AllSourcesFailed { total: 1 }));
    }

    #[tokio::test]
    async fn success_threshold_is_enforced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("||ok.example^"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad.txt"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let sources_file = dir.path().join("rules.txt");
        std::fs::write(
            &sources_file,
            format!("{0}/ok.txt\n{0}/bad.txt\n", server.uri()),
        )
        .expect("write sources");

        let mut config = test_config(dir.path(), sources_file);
        config.min_success_percent = 75;

        let err = build(&config, &SilentProgress).await.unwrap_err();
        assert!(matches!(
            err,
            ListforgeError::BelowSuccessThreshold {
                success: 1,
                total: 2,
                min_percent: 75,
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn compile_step_transforms_the_payload() {
        use std::os::unix::fs::PermissionsExt;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("||raw.example^"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let sources_file = dir.path().join("rules.txt");
        std::fs::write(&sources_file, format!("{}/raw.txt\n", server.uri()))
            .expect("write sources");

        // Shim compiler that annotates its output.
        let shim = dir.path().join("shim.sh");
        std::fs::write(
            &shim,
            "#!/bin/sh\n{ echo '! compiled'; cat \"$2\"; } > \"$4\"\n",
        )
        .expect("write shim");
        std::fs::set_permissions(&shim, std::fs::Permissions::from_mode(0o755))
            .expect("chmod shim");

        let mut config = test_config(dir.path(), sources_file);
        config.compiler.enabled = true;
        config.compiler.command = shim.to_string_lossy().to_string();

        let outcome = build(&config, &SilentProgress).await.expect("build");
        let BuildOutcome::Built(result) = outcome else {
            panic!("expected a built artifact");
        };

        let content = std::fs::read_to_string(&result.output_path).expect("read artifact");
        assert!(content.contains("! compiled\n||raw.example^"));
        // The `! compiled` marker is a comment, not a rule.
        assert_eq!(result.rule_count, 1);
    }
}
