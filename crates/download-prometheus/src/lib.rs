//! Download links for the latest Dingo Prometheus tile.
//!
//! `/download-prometheus` replies straight away, then looks up the newest
//! released `.pivotal` file in the product's public bucket, signs a
//! five-minute download link for it and posts:
//!
//! - the link, privately, to the user who asked,
//! - an announcement to the channel the command came from,
//! - a note to the sales channel saying who asked.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod robot;
pub mod version;

pub use config::DownloadConfig;
pub use error::{DownloadError, VersionError};
pub use robot::{DownloadPrometheus, TileDownload, COMMAND};
pub use version::{find_latest, parse_version, LatestTile};
