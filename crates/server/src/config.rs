//! Configuration for the slackbot service.

use std::net::{IpAddr, SocketAddr};

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::{filter::ParseError, EnvFilter};

/// Crates whose events are logged at `info` unless `RUST_LOG` says otherwise.
const LOG_TARGETS: [&str; 4] = ["slackbot", "robots", "storage", "download_prometheus"];

/// Errors turning command-line input into a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid listen host {host}: {source}")]
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Slackbot HTTP service.
#[derive(Debug, Parser)]
#[command(name = "slackbot", version, about = "Route Slack commands to robots")]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Stay silent on messages no robot handles (any non-empty value)
    #[arg(long, env = "IGNORE_NON_BOT_MESSAGES")]
    pub ignore_non_bot_messages: Option<String>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Resolved service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds.
    pub addr: SocketAddr,
    /// Reply with an empty body instead of a complaint for unknown commands.
    pub ignore_non_bot_messages: bool,
    pub log_format: LogFormat,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let ip: IpAddr = cli
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                host: cli.host.clone(),
                source,
            })?;

        Ok(Self {
            addr: SocketAddr::new(ip, cli.port),
            ignore_non_bot_messages: cli
                .ignore_non_bot_messages
                .is_some_and(|v| !v.is_empty()),
            log_format: cli.log_format,
        })
    }
}

/// `RUST_LOG` filter with `info` enabled for every workspace crate.
///
/// # Errors
///
/// Returns an error if a directive does not parse.
pub fn default_env_filter() -> Result<EnvFilter, ParseError> {
    LOG_TARGETS
        .iter()
        .try_fold(EnvFilter::from_default_env(), |filter, target| {
            Ok(filter.add_directive(format!("{target}=info").parse()?))
        })
}
