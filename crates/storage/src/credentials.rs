//! AWS credentials.

use std::env;
use std::fmt;

use crate::error::{Result, StorageError};

/// Access key pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create credentials from a key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read credentials from the environment.
    ///
    /// The access key comes from `AWS_ACCESS_KEY_ID` or `AWS_ACCESS_KEY`, the
    /// secret from `AWS_SECRET_ACCESS_KEY` or `AWS_SECRET_KEY`, and an
    /// optional `AWS_SESSION_TOKEN` is picked up when present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingCredentials`] if either half of the key
    /// pair is missing.
    pub fn from_env() -> Result<Self> {
        let access_key_id = first_var(&["AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY"]).ok_or_else(|| {
            StorageError::MissingCredentials("AWS_ACCESS_KEY_ID or AWS_ACCESS_KEY".to_string())
        })?;
        let secret_access_key = first_var(&["AWS_SECRET_ACCESS_KEY", "AWS_SECRET_KEY"])
            .ok_or_else(|| {
                StorageError::MissingCredentials(
                    "AWS_SECRET_ACCESS_KEY or AWS_SECRET_KEY".to_string(),
                )
            })?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: first_var(&["AWS_SESSION_TOKEN"]),
        })
    }
}

// Keep the secret out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
}
