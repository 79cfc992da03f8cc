//! Error types for message delivery.

use thiserror::Error;

/// Errors that can occur when posting a message to Slack.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No incoming webhook token for the team
    #[error("No incoming webhook token configured for team {team_domain}")]
    MissingToken { team_domain: String },

    /// The payload carries no `response_url` to reply to
    #[error("Payload has no response URL")]
    NoResponseUrl,

    /// Rate limited by Slack
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Slack answered with a non-success status
    #[error("Slack returned {status}: {body}")]
    Status { status: u16, body: String },
}
