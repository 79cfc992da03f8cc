//! Error types for the download robot.

use thiserror::Error;

/// Errors picking a version out of a listing.
#[derive(Debug, Error)]
pub enum VersionError {
    /// No released tile in the bucket.
    #[error("No published releases yet for {0}")]
    NoReleases(String),

    /// The product label produced an invalid file pattern.
    #[error("Invalid tile pattern: {0}")]
    Pattern(String),
}

/// Errors in the deferred download workflow.
///
/// Displayed verbatim to the user who ran the command.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Storage(#[from] storage::StorageError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("Could not deliver message: {0}")]
    Delivery(#[from] robots::DeliveryError),
}
