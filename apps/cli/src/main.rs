//! listforge CLI — concurrent filter-list aggregation tool.
//!
//! Downloads every source in a plain-text URL list, merges the
//! successes, runs them through an external rule compiler, and writes a
//! single annotated blocklist artifact.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
