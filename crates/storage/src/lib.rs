//! S3-compatible object storage client.
//!
//! Covers what the robots need from a bucket: listing keys under a prefix and
//! handing out time-limited download links. Requests are signed with AWS
//! Signature Version 4, so the client works against AWS S3 and compatible
//! services (`Region::with_endpoint`).

pub mod bucket;
pub mod credentials;
pub mod error;
pub mod listing;
pub mod signing;

pub use bucket::{Bucket, Region};
pub use credentials::Credentials;
pub use error::StorageError;
pub use listing::{ListResult, ObjectSummary};
