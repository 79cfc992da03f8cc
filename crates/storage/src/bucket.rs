//! Bucket operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::credentials::Credentials;
use crate::error::{Result, StorageError};
use crate::listing::{parse_error, parse_list_result, ListResult};
use crate::signing::{
    canonical_query_string, encode_path, presign_url, sign_request, CanonicalRequest,
    SigningParams, EMPTY_PAYLOAD_SHA256,
};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Most keys S3 returns in one `ListObjects` page.
pub const MAX_KEYS_PER_PAGE: u32 = 1000;

/// Signing service name.
const SERVICE: &str = "s3";

/// An S3 region and the endpoint that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub endpoint: String,
}

impl Region {
    /// AWS region by name, e.g. `ap-southeast-1`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let endpoint = if name == "us-east-1" {
            "https://s3.amazonaws.com".to_string()
        } else {
            format!("https://s3.{name}.amazonaws.com")
        };
        Self { name, endpoint }
    }

    /// Region served from a custom endpoint (S3-compatible stores, tests).
    pub fn with_endpoint(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// `Host` header value for the endpoint.
    fn host(&self) -> Result<String> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| StorageError::Malformed(format!("invalid endpoint {}: {e}", self.endpoint)))?;
        let host = url
            .host_str()
            .ok_or_else(|| StorageError::Malformed(format!("endpoint has no host: {}", self.endpoint)))?;
        Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// A bucket addressed path-style (`<endpoint>/<bucket>/<key>`).
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    region: Region,
    credentials: Credentials,
    client: Client,
}

impl Bucket {
    /// Create a bucket handle.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(name: impl Into<String>, region: Region, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            name: name.into(),
            region,
            credentials,
            client,
        })
    }

    /// Bucket name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region the bucket lives in.
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    fn signing_params(&self, time: DateTime<Utc>) -> SigningParams<'_> {
        SigningParams {
            credentials: &self.credentials,
            region: &self.region.name,
            service: SERVICE,
            time,
        }
    }

    /// List one page of objects.
    ///
    /// Empty `prefix`, `delimiter` or `marker` are left out of the request.
    /// `max_keys` is capped at [`MAX_KEYS_PER_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service rejects it, or the
    /// response is not a listing.
    pub async fn list(
        &self,
        prefix: &str,
        delimiter: &str,
        marker: &str,
        max_keys: u32,
    ) -> Result<ListResult> {
        let mut query = Vec::new();
        for (name, value) in [("prefix", prefix), ("delimiter", delimiter), ("marker", marker)] {
            if !value.is_empty() {
                query.push((name.to_string(), value.to_string()));
            }
        }
        if max_keys > 0 {
            query.push((
                "max-keys".to_string(),
                max_keys.min(MAX_KEYS_PER_PAGE).to_string(),
            ));
        }

        let path = format!("/{}", self.name);
        let host = self.region.host()?;
        let request = CanonicalRequest {
            method: "GET",
            host: &host,
            path: &path,
            query: &query,
        };
        let headers = sign_request(
            &self.signing_params(Utc::now()),
            &request,
            EMPTY_PAYLOAD_SHA256,
        );

        let mut url = format!("{}{}", self.region.endpoint, encode_path(&path));
        if !query.is_empty() {
            url.push('?');
            url.push_str(&canonical_query_string(&query));
        }

        debug!(bucket = %self.name, prefix = %prefix, marker = %marker, "Listing bucket");

        let mut builder = self.client.get(&url);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = parse_error(&body).unwrap_or_else(|| (String::new(), body.clone()));
            warn!(
                bucket = %self.name,
                status = %status,
                code = %code,
                "S3 list request failed"
            );
            return Err(StorageError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        parse_list_result(&body)
    }

    /// List every object under `prefix`, following truncated pages.
    ///
    /// # Errors
    ///
    /// Returns the first error any page produces, or
    /// [`StorageError::Malformed`] when a truncated page does not move the
    /// marker forward.
    pub async fn list_all(&self, prefix: &str, delimiter: &str) -> Result<ListResult> {
        let mut result = self.list(prefix, delimiter, "", MAX_KEYS_PER_PAGE).await?;
        let mut marker = next_page_marker(&result, "")?;

        while let Some(current) = marker {
            let page = self.list(prefix, delimiter, &current, MAX_KEYS_PER_PAGE).await?;
            marker = next_page_marker(&page, &current)?;

            result.contents.extend(page.contents);
            result.common_prefixes.extend(page.common_prefixes);
            result.is_truncated = page.is_truncated;
            result.next_marker = page.next_marker;
        }

        Ok(result)
    }

    /// Presigned GET URL for `key`, valid until `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidExpiry`] if `expires_at` is not in the
    /// future or is more than seven days away.
    pub fn signed_url(&self, key: &str, expires_at: DateTime<Utc>) -> Result<String> {
        self.signed_url_at(key, Utc::now(), expires_at)
    }

    /// Like [`Bucket::signed_url`] with an explicit signing time.
    ///
    /// # Errors
    ///
    /// See [`Bucket::signed_url`].
    pub fn signed_url_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String> {
        let expires_secs = (expires_at - now).num_seconds();
        let path = format!("/{}/{}", self.name, key.trim_start_matches('/'));
        let host = self.region.host()?;
        let request = CanonicalRequest {
            method: "GET",
            host: &host,
            path: &path,
            query: &[],
        };

        presign_url(
            &self.signing_params(now),
            &self.region.endpoint,
            &request,
            expires_secs,
        )
    }
}

/// Marker for the page after `page`, which was requested with `previous`.
fn next_page_marker(page: &ListResult, previous: &str) -> Result<Option<String>> {
    if !page.is_truncated {
        return Ok(None);
    }
    match page.continuation_marker() {
        Some(marker) if marker > previous => Ok(Some(marker.to_string())),
        Some(marker) => Err(StorageError::Malformed(format!(
            "truncated listing did not advance past marker {marker:?}"
        ))),
        None => Err(StorageError::Malformed(
            "truncated listing page without entries or NextMarker".to_string(),
        )),
    }
}
