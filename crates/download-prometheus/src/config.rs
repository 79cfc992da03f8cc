//! Configuration for the download robot.

use std::env;
use std::time::Duration;

/// Product served by the robot and where its tiles live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Display name, e.g. "Dingo Prometheus".
    pub product_name: String,
    /// Label used in bucket and file names, e.g. "dingo-prometheus".
    pub product_label: String,
    /// Region of the tile bucket.
    pub region: String,
    /// Custom S3 endpoint (S3-compatible stores).
    pub s3_endpoint: Option<String>,
    /// Channel ID that hears about every download.
    pub sales_channel: String,
    /// Name the robot posts as.
    pub username: String,
    /// Emoji the robot posts with.
    pub icon_emoji: String,
    /// Lifetime of generated download links.
    pub link_expiry: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            product_name: "Dingo Prometheus".to_string(),
            product_label: "dingo-prometheus".to_string(),
            region: env::var("DOWNLOAD_PROMETHEUS_REGION")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "ap-southeast-1".to_string()),
            s3_endpoint: env::var("DOWNLOAD_PROMETHEUS_S3_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty()),
            // #sales-announcements
            sales_channel: env::var("DOWNLOAD_PROMETHEUS_SALES_CHANNEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "G0N9JP199".to_string()),
            username: "dingobot".to_string(),
            icon_emoji: ":dingo:".to_string(),
            link_expiry: Duration::from_secs(5 * 60),
        }
    }
}

impl DownloadConfig {
    /// Bucket holding the public tiles: `<label>-public-pivotaltile`.
    #[must_use]
    pub fn bucket_name(&self) -> String {
        format!("{}-public-pivotaltile", self.product_label)
    }
}
