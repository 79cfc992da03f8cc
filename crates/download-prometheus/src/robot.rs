//! The `download-prometheus` robot.

use async_trait::async_trait;
use chrono::Utc;
use robots::{Message, ParseStyle, Payload, Robot, SlackClient};
use storage::{Bucket, Credentials, Region};
use tracing::{error, info, warn};

use crate::config::DownloadConfig;
use crate::error::DownloadError;
use crate::version::find_latest;

/// Command the robot answers to.
pub const COMMAND: &str = "download-prometheus";

/// A resolved download: the version text and a link to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDownload {
    /// Published version without a leading `v`.
    pub version: String,
    pub url: String,
}

/// Hands out signed download links for the latest released tile.
///
/// The reply comes back immediately; the bucket lookup and the follow-up
/// messages happen on a background task.
#[derive(Clone)]
pub struct DownloadPrometheus {
    config: DownloadConfig,
    slack: SlackClient,
    /// Fixed credentials; read from the environment per lookup when unset.
    credentials: Option<Credentials>,
}

impl DownloadPrometheus {
    #[must_use]
    pub fn new(config: DownloadConfig, slack: SlackClient) -> Self {
        Self {
            config,
            slack,
            credentials: None,
        }
    }

    /// Use these credentials instead of reading the environment.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn bucket(&self) -> Result<Bucket, DownloadError> {
        let credentials = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => Credentials::from_env()?,
        };
        let region = match &self.config.s3_endpoint {
            Some(endpoint) => Region::with_endpoint(&self.config.region, endpoint),
            None => Region::new(&self.config.region),
        };
        Ok(Bucket::new(self.config.bucket_name(), region, credentials)?)
    }

    /// Find the newest tile and sign a link to it.
    ///
    /// # Errors
    ///
    /// Fails when the bucket cannot be listed, holds no release, or the link
    /// cannot be signed.
    pub async fn lookup_latest(&self) -> Result<TileDownload, DownloadError> {
        let label = &self.config.product_label;
        let bucket = self.bucket()?;

        info!(bucket = %bucket.name(), "Getting bucket contents");
        let listing = bucket.list_all(label, "/").await?;
        let tile = find_latest(listing.keys(), label)?;

        let expiry = chrono::Duration::from_std(self.config.link_expiry)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        let url = bucket.signed_url(&tile.key, Utc::now() + expiry)?;

        info!(version = %tile.raw, key = %tile.key, "Resolved latest tile");

        Ok(TileDownload {
            version: tile.display_version().to_string(),
            url,
        })
    }

    /// Look up the tile and post the follow-up messages.
    ///
    /// The invoking user gets the link, the invoking channel and the sales
    /// channel each get an announcement. Every failure is reported back to
    /// the user; a failed announcement does not stop the next one.
    pub async fn deferred_action(&self, payload: &Payload) {
        let download = match self.lookup_latest().await {
            Ok(download) => download,
            Err(e) => {
                self.send_error_response(payload, &e).await;
                return;
            }
        };

        let product = &self.config.product_name;
        let version = &download.version;

        let reply = self
            .message(format!(
                "Download {product} v{version} tile at {}",
                download.url
            ))
            .channel(&payload.channel_id);
        if let Err(e) = self.slack.send_response(&payload.response_url, &reply).await {
            self.send_error_response(payload, &DownloadError::from(e)).await;
        }

        let announcement = self
            .message(format!(
                "Another happy {product} v{version} tile sent on its way to a new home! (via `/{COMMAND}`)"
            ))
            .channel(&payload.channel_id);
        if let Err(e) = self
            .slack
            .send_incoming(&payload.team_domain, &announcement)
            .await
        {
            self.send_error_response(payload, &DownloadError::from(e)).await;
        }

        let sales = self
            .message(format!(
                "Product {product} v{version} was requested by @{} in channel @{}",
                payload.user_name, payload.channel_name
            ))
            .channel(&self.config.sales_channel);
        if let Err(e) = self.slack.send_incoming(&payload.team_domain, &sales).await {
            self.send_error_response(payload, &DownloadError::from(e)).await;
        }
    }

    async fn send_error_response(&self, payload: &Payload, err: &DownloadError) {
        error!(
            team_domain = %payload.team_domain,
            channel_name = %payload.channel_name,
            error = %err,
            "Download request failed"
        );

        if payload.response_url.is_empty() {
            warn!("No response URL to report the failure to");
            return;
        }

        let message = self.message(err.to_string()).channel(&payload.channel_id);
        if let Err(e) = self.slack.send_response(&payload.response_url, &message).await {
            warn!(error = %e, "Failed to report error to user");
        }
    }

    fn message(&self, text: String) -> Message {
        Message::new(text)
            .username(&self.config.username)
            .icon_emoji(&self.config.icon_emoji)
            .unfurl_links(false)
            .parse(ParseStyle::Full)
    }
}

#[async_trait]
impl Robot for DownloadPrometheus {
    async fn run(&self, payload: &Payload) -> String {
        let robot = self.clone();
        let payload = payload.clone();
        tokio::spawn(async move {
            robot.deferred_action(&payload).await;
        });

        format!(
            "Baby dingos are building a URL just for you for the latest {} tile.",
            self.config.product_name
        )
    }

    fn description(&self) -> String {
        format!(
            "Fetch URL to download latest {} tile.",
            self.config.product_name
        )
    }
}
