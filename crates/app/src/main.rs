//! Nexus - Main Entry Point

use anyhow::Context;
use clap::Parser;
use nexus::{AppConfig, Cli, commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init(&config.log_level);

    tracing::debug!(state_file = %config.state_file.display(), "configuration loaded");

    commands::run(cli, config).await
}
