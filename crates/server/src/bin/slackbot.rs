//! Slackbot service binary.
//!
//! Registers the robots and serves Slack callbacks until shut down.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use download_prometheus::{DownloadConfig, DownloadPrometheus};
use robots::{HelpRobot, RobotRegistry, SlackClient, TokenStore, HELP_COMMAND};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*};

use slackbot::{default_env_filter, run_server, AppState, Cli, Config, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::try_from(cli)?;

    let filter = default_env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting slackbot...");

    let tokens = Arc::new(TokenStore::from_env());
    info!(count = tokens.len(), "Loaded Slack tokens");

    let slack = SlackClient::new(Arc::clone(&tokens));

    let mut robots = RobotRegistry::new();
    robots.register(
        download_prometheus::COMMAND,
        Arc::new(DownloadPrometheus::new(DownloadConfig::default(), slack)),
    );
    // Help lists the robots registered before it.
    let help = HelpRobot::from_registry(&robots);
    robots.register(HELP_COMMAND, Arc::new(help));

    for command in robots.commands() {
        info!(command = %command, "Registered robot");
    }

    let state = AppState {
        registry: Arc::new(robots),
        tokens,
        ignore_non_bot_messages: config.ignore_non_bot_messages,
    };

    run_server(state, config.addr).await
}
