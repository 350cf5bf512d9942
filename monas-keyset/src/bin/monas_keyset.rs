//! Keyset tool entry point.

use anyhow::{Context, Result};
use clap::Parser;
use monas_keyset::presentation::{self, Cli};
use monas_keyset::KeysetConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = KeysetConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);

    // stdout may carry keyset bytes, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    presentation::run(cli.command, &config, &mut std::io::stdout().lock())
}
