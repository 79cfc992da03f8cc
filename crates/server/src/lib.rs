//! Slack endpoint for robots.
//!
//! Receives slash commands on `/slack` and outgoing webhooks on
//! `/slack_hook`, checks their tokens and hands them to the registered
//! robots.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod server;

pub use auth::{authenticate_hook, authenticate_slash};
pub use config::{default_env_filter, Cli, Config, ConfigError, LogFormat};
pub use server::{build_router, run_server, shutdown_signal, AppState};
