//! Posting messages back to Slack.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::message::Message;
use crate::tokens::TokenStore;

/// Path of Slack's legacy incoming webhook endpoint.
const INCOMING_WEBHOOK_PATH: &str = "/services/hooks/incoming-webhook";

/// Default timeout for webhook requests.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Seconds to wait when Slack rate limits without a `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Client for Slack incoming webhooks and slash command responses.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    tokens: Arc<TokenStore>,
    /// Overrides `https://<team>.slack.com` when set.
    base_url: Option<String>,
}

impl SlackClient {
    /// Create a client posting to `https://<team>.slack.com`.
    #[must_use]
    pub fn new(tokens: Arc<TokenStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            tokens,
            base_url: None,
        }
    }

    /// Post incoming webhooks to a fixed base URL instead of the team host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Incoming webhook URL for a team, without the token.
    #[must_use]
    pub fn incoming_webhook_url(&self, team_domain: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{INCOMING_WEBHOOK_PATH}"),
            None => format!("https://{team_domain}.slack.com{INCOMING_WEBHOOK_PATH}"),
        }
    }

    /// Post a message through a team's incoming webhook.
    ///
    /// The message is sent as the `payload` form field, authenticated with
    /// the team's `<TEAM>_IN_TOKEN`.
    pub async fn send_incoming(
        &self,
        team_domain: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        let token = self
            .tokens
            .in_token(team_domain)
            .ok_or_else(|| DeliveryError::MissingToken {
                team_domain: team_domain.to_string(),
            })?;

        let payload = serde_json::to_string(message)?;
        let url = self.incoming_webhook_url(team_domain);

        debug!(
            channel = "slack",
            team_domain = %team_domain,
            target = ?message.channel,
            "Sending incoming webhook"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("token", token)])
            .form(&[("payload", payload)])
            .send()
            .await?;

        check_response(response).await
    }

    /// Reply to a slash command through its `response_url`.
    pub async fn send_response(
        &self,
        response_url: &str,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        if response_url.is_empty() {
            return Err(DeliveryError::NoResponseUrl);
        }

        debug!(channel = "slack", "Sending slash command response");

        let response = self.client.post(response_url).json(message).send().await?;

        check_response(response).await
    }
}

async fn check_response(response: Response) -> Result<(), DeliveryError> {
    let status = response.status();

    if status.is_success() {
        debug!(channel = "slack", "Message delivered");
        return Ok(());
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

        warn!(
            channel = "slack",
            retry_after_secs = retry_after,
            "Rate limited by Slack"
        );

        return Err(DeliveryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();

    warn!(
        channel = "slack",
        status = %status,
        body = %body,
        "Slack webhook request failed"
    );

    Err(DeliveryError::Status {
        status: status.as_u16(),
        body,
    })
}
