//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use listforge_core::pipeline::{BuildOutcome, BuildResult, ProgressReporter};
use listforge_core::sources;
use listforge_shared::{AppConfig, FetchConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// listforge — merge remote filter lists into one blocklist artifact.
#[derive(Parser)]
#[command(
    name = "listforge",
    version,
    about = "Download, merge, and compile filter-list sources into a single annotated blocklist.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch all sources and build the merged blocklist artifact.
    Build {
        /// Source list file (overrides config).
        #[arg(short, long)]
        sources: Option<PathBuf>,

        /// Output directory (overrides config).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Publish directory (overrides config).
        #[arg(short, long)]
        publish: Option<PathBuf>,

        /// Maximum concurrent downloads (overrides config).
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Per-request timeout in seconds (overrides config).
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Minimum acceptable success percentage (overrides config).
        #[arg(long)]
        min_success: Option<u8>,

        /// Skip the external compiler and emit the merged rules as-is.
        #[arg(long)]
        no_compile: bool,
    },

    /// Parse the source list and print the effective URLs.
    Sources {
        /// Source list file (overrides config).
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "listforge=info",
        1 => "listforge=debug",
        _ => "listforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            sources,
            out,
            publish,
            concurrency,
            timeout,
            min_success,
            no_compile,
        } => {
            cmd_build(
                sources,
                out,
                publish,
                concurrency,
                timeout,
                min_success,
                no_compile,
            )
            .await
        }
        Command::Sources { file } => cmd_sources(file).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
async fn cmd_build(
    sources: Option<PathBuf>,
    out: Option<PathBuf>,
    publish: Option<PathBuf>,
    concurrency: Option<usize>,
    timeout: Option<u64>,
    min_success: Option<u8>,
    no_compile: bool,
) -> Result<()> {
    let mut config = load_config()?;

    // CLI flags override config file values.
    if let Some(c) = concurrency {
        config.defaults.concurrency = c;
    }
    if let Some(t) = timeout {
        config.defaults.timeout_secs = t;
    }
    if let Some(m) = min_success {
        config.defaults.min_success_percent = m;
    }
    if no_compile {
        config.compiler.enabled = false;
    }

    let build_config = listforge_core::BuildConfig {
        sources_file: sources.unwrap_or_else(|| PathBuf::from(&config.paths.sources_file)),
        output_dir: out.unwrap_or_else(|| PathBuf::from(&config.paths.output_dir)),
        publish_dir: publish.unwrap_or_else(|| PathBuf::from(&config.paths.publish_dir)),
        file_name: config.paths.file_name.clone(),
        fetch: FetchConfig::from(&config),
        min_success_percent: config.defaults.min_success_percent,
        compiler: config.compiler.clone(),
        list: config.list.clone(),
    };

    info!(
        sources = %build_config.sources_file.display(),
        concurrency = build_config.fetch.concurrency,
        "building blocklist"
    );

    let reporter = CliProgress::new();

    match listforge_core::build(&build_config, &reporter).await? {
        BuildOutcome::Built(result) => {
            println!();
            println!("  Blocklist built successfully!");
            println!(
                "  Sources: {} ({} ok, {} failed)",
                result.summary.total,
                result.summary.success,
                result.summary.failed_count()
            );
            println!("  Rules:   {}", result.rule_count);
            println!("  Output:  {}", result.output_path.display());
            println!("  Publish: {}", result.publish_path.display());
            println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
            if !result.summary.failed.is_empty() {
                println!();
                println!("  Failed sources:");
                for url in &result.summary.failed {
                    println!("  - {url}");
                }
            }
            println!();
        }
        BuildOutcome::NothingToDo => {
            println!("Source list is empty — nothing to build.");
        }
    }

    Ok(())
}

async fn cmd_sources(file: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let path = file.unwrap_or_else(|| PathBuf::from(&config.paths.sources_file));

    let urls = sources::read_sources(&path)?;
    println!("{} sources in {}", urls.len(), path.display());
    for url in &urls {
        println!("  {url}");
    }

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_fetched(&self, url: &str, ok: bool, current: usize, total: usize) {
        let mark = if ok { "ok" } else { "FAILED" };
        self.spinner
            .set_message(format!("Downloading [{current}/{total}] {mark} {url}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
