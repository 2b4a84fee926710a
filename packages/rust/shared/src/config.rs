//! Application configuration for listforge.
//!
//! Config is looked up in `./listforge.toml` first (repo-local, the
//! common case for CI checkouts), then `~/.listforge/listforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ListforgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "listforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".listforge";

// ---------------------------------------------------------------------------
// Config structs (matching listforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fetch defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Published list metadata.
    #[serde(default)]
    pub list: ListConfig,

    /// External rule compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Input/output locations.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum concurrent downloads.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum acceptable success percentage (0 = only total failure is fatal).
    #[serde(default)]
    pub min_success_percent: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            min_success_percent: 0,
        }
    }
}

fn default_concurrency() -> usize {
    8
}
fn default_timeout_secs() -> u64 {
    45
}

/// `[list]` section — metadata stamped into the output header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Human-readable list title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Homepage URL (defaults from `GITHUB_REPOSITORY` when unset).
    #[serde(default)]
    pub homepage: Option<String>,

    /// Expiry note for consumers (free text).
    #[serde(default = "default_expires")]
    pub expires: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            homepage: None,
            expires: default_expires(),
        }
    }
}

fn default_title() -> String {
    "Merged filter rules".into()
}
fn default_expires() -> String {
    "12 hours".into()
}

/// `[compiler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Command to invoke as `<command> -i <merged> -o <compiled>`.
    #[serde(default = "default_compiler_command")]
    pub command: String,

    /// When false, the merged payload passes through uncompiled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_compiler_command(),
            enabled: true,
        }
    }
}

fn default_compiler_command() -> String {
    "hostlist-compiler".into()
}
fn default_true() -> bool {
    true
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Plain-text file listing one source URL per line.
    #[serde(default = "default_sources_file")]
    pub sources_file: String,

    /// Directory for the primary output artifact.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory the artifact is copied to for publishing.
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,

    /// Output artifact file name.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources_file: default_sources_file(),
            output_dir: default_output_dir(),
            publish_dir: default_publish_dir(),
            file_name: default_file_name(),
        }
    }
}

fn default_sources_file() -> String {
    "setting/rules.txt".into()
}
fn default_output_dir() -> String {
    "rules".into()
}
fn default_publish_dir() -> String {
    "publish".into()
}
fn default_file_name() -> String {
    "output.txt".into()
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum concurrent downloads.
    pub concurrency: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            concurrency: config.defaults.concurrency,
            timeout: Duration::from_secs(config.defaults.timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.listforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ListforgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the home config file (`~/.listforge/listforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config. Checks the working directory first,
/// then the home config; returns defaults if neither file exists.
pub fn load_config() -> Result<AppConfig> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ListforgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ListforgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ListforgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ListforgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ListforgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("concurrency"));
        assert!(toml_str.contains("hostlist-compiler"));
        assert!(toml_str.contains("setting/rules.txt"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.concurrency, 8);
        assert_eq!(parsed.defaults.timeout_secs, 45);
        assert_eq!(parsed.paths.file_name, "output.txt");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
concurrency = 2

[list]
title = "My rules"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.concurrency, 2);
        assert_eq!(config.defaults.timeout_secs, 45);
        assert_eq!(config.list.title, "My rules");
        assert_eq!(config.list.expires, "12 hours");
        assert!(config.compiler.enabled);
    }

    #[test]
    fn fetch_config_from_app_config() {
        let app = AppConfig::default();
        let fetch = FetchConfig::from(&app);
        assert_eq!(fetch.concurrency, 8);
        assert_eq!(fetch.timeout, Duration::from_secs(45));
    }
}
