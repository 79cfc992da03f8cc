//! Robot plugins for the slackbot command server.
//!
//! A robot is a handler bound to a chat command. The server parses the
//! incoming Slack callback into a [`Payload`], looks the command up in a
//! [`RobotRegistry`] and runs every robot registered for it, joining their
//! replies into a single response.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use robots::{Payload, Robot, RobotRegistry};
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl Robot for Ping {
//!     async fn run(&self, _payload: &Payload) -> String {
//!         "pong".to_string()
//!     }
//!
//!     fn description(&self) -> String {
//!         "Replies with pong".to_string()
//!     }
//! }
//!
//! let mut registry = RobotRegistry::new();
//! registry.register("ping", Arc::new(Ping));
//! ```
//!
//! # Delivery
//!
//! Robots that do work after replying use [`SlackClient`] to post follow-up
//! messages, either back to the invoking user through the slash command's
//! `response_url` or to a channel through a team's incoming webhook.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod delivery;
pub mod error;
pub mod help;
pub mod message;
pub mod payload;
pub mod registry;
pub mod tokens;

pub use delivery::SlackClient;
pub use error::DeliveryError;
pub use help::{HelpRobot, HELP_COMMAND};
pub use message::{Attachment, AttachmentField, Message, ParseStyle, ResponseType};
pub use payload::Payload;
pub use registry::RobotRegistry;
pub use tokens::TokenStore;

use async_trait::async_trait;

/// A command handler.
#[async_trait]
pub trait Robot: Send + Sync {
    /// Handle a command and return the text shown to the invoking user.
    ///
    /// Long running work should be spawned onto the runtime so the chat
    /// platform gets its reply within its callback timeout.
    async fn run(&self, payload: &Payload) -> String;

    /// One line describing what the robot does, listed by the help robot.
    fn description(&self) -> String;
}
