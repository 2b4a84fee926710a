//! Shared types, error model, and configuration for listforge.
//!
//! This crate is the foundation depended on by all other listforge crates.
//! It provides:
//! - [`ListforgeError`] — the unified error type
//! - Domain types ([`RunSummary`])
//! - Configuration ([`AppConfig`], [`FetchConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CompilerConfig, DefaultsConfig, FetchConfig, ListConfig, PathsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ListforgeError, Result};
pub use types::RunSummary;
