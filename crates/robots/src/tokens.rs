//! Shared secrets for Slack callbacks and webhooks.
//!
//! Secrets live in the environment, one variable per robot or team:
//!
//! - `<ROBOT>_SLACK_TOKEN`: token Slack sends with a robot's slash command
//! - `<TEAM>_OUT_TOKEN`: token Slack sends with a team's outgoing webhook
//! - `<TEAM>_IN_TOKEN`: token for posting to a team's incoming webhook
//!
//! Names are upper-cased with `-` replaced by `_`, so the `download-prometheus`
//! robot reads `DOWNLOAD_PROMETHEUS_SLACK_TOKEN`.

use std::collections::HashMap;

const SLASH_SUFFIX: &str = "_SLACK_TOKEN";
const OUT_SUFFIX: &str = "_OUT_TOKEN";
const IN_SUFFIX: &str = "_IN_TOKEN";

/// Snapshot of the token variables taken at start-up.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: HashMap<String, String>,
}

impl TokenStore {
    /// Collect every token variable from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a store from `(variable, value)` pairs.
    ///
    /// Variables without a token suffix and empty values are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tokens = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, v)| {
                !v.is_empty()
                    && [SLASH_SUFFIX, OUT_SUFFIX, IN_SUFFIX]
                        .iter()
                        .any(|suffix| k.ends_with(suffix))
            })
            .collect();
        Self { tokens }
    }

    /// Slash command token for a robot.
    #[must_use]
    pub fn slash_token(&self, robot: &str) -> Option<&str> {
        self.lookup(robot, SLASH_SUFFIX)
    }

    /// Outgoing webhook token for a team domain.
    #[must_use]
    pub fn out_token(&self, team_domain: &str) -> Option<&str> {
        self.lookup(team_domain, OUT_SUFFIX)
    }

    /// Incoming webhook token for a team domain.
    #[must_use]
    pub fn in_token(&self, team_domain: &str) -> Option<&str> {
        self.lookup(team_domain, IN_SUFFIX)
    }

    /// Number of tokens held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no tokens are configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn lookup(&self, name: &str, suffix: &str) -> Option<&str> {
        self.tokens
            .get(&format!("{}{suffix}", normalize(name)))
            .map(String::as_str)
    }
}

/// Environment variable form of a robot or team name.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}
