//! Request authentication.
//!
//! Slash commands carry the per-command token Slack generated for them,
//! outgoing webhooks the per-team token. Both are compared against
//! [`TokenStore`] entries in constant time.

use robots::{Payload, TokenStore};
use subtle::ConstantTimeEq;

/// Check a slash command payload.
///
/// The payload must name a command and carry a token. When
/// `<ROBOT>_SLACK_TOKEN` is configured the token must match it; commands
/// without a configured token accept any token.
#[must_use]
pub fn authenticate_slash(tokens: &TokenStore, payload: &Payload) -> bool {
    if payload.command.is_empty() || payload.token.is_empty() {
        return false;
    }

    match tokens.slash_token(&payload.robot) {
        Some(expected) => tokens_match(expected, &payload.token),
        None => true,
    }
}

/// Check an outgoing webhook payload.
///
/// The payload must carry text, and its token must equal the team's
/// configured `<TEAM>_OUT_TOKEN`. Teams without one are rejected.
#[must_use]
pub fn authenticate_hook(tokens: &TokenStore, payload: &Payload) -> bool {
    if payload.text.is_empty() {
        return false;
    }

    tokens
        .out_token(&payload.team_domain)
        .is_some_and(|expected| tokens_match(expected, &payload.token))
}

fn tokens_match(expected: &str, given: &str) -> bool {
    expected.as_bytes().ct_eq(given.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> TokenStore {
        TokenStore::from_pairs([
            ("DOWNLOAD_PROMETHEUS_SLACK_TOKEN", "slash-secret"),
            ("DINGO_TILES_OUT_TOKEN", "out-secret"),
        ])
    }

    fn slash(command: &str, token: &str) -> Payload {
        Payload {
            command: command.to_string(),
            token: token.to_string(),
            ..Payload::default()
        }
        .from_slash_command()
    }

    fn hook(team_domain: &str, token: &str, text: &str) -> Payload {
        Payload {
            team_domain: team_domain.to_string(),
            token: token.to_string(),
            text: text.to_string(),
            ..Payload::default()
        }
    }

    #[test]
    fn test_slash_with_configured_token() {
        let tokens = tokens();
        assert!(authenticate_slash(
            &tokens,
            &slash("/download-prometheus", "slash-secret")
        ));
        assert!(!authenticate_slash(
            &tokens,
            &slash("/download-prometheus", "slash-secre")
        ));
    }

    #[test]
    fn test_slash_without_configured_token() {
        assert!(authenticate_slash(&tokens(), &slash("/c", "anything")));
    }

    #[test]
    fn test_slash_requires_command_and_token() {
        let tokens = tokens();
        assert!(!authenticate_slash(&tokens, &slash("", "slash-secret")));
        assert!(!authenticate_slash(&tokens, &slash("/c", "")));
    }

    #[test]
    fn test_hook_token() {
        let tokens = tokens();
        assert!(authenticate_hook(
            &tokens,
            &hook("dingo-tiles", "out-secret", "bot c")
        ));
        assert!(!authenticate_hook(
            &tokens,
            &hook("dingo-tiles", "wrong", "bot c")
        ));
    }

    #[test]
    fn test_hook_unknown_team_rejected() {
        assert!(!authenticate_hook(&tokens(), &hook("other", "", "bot c")));
        assert!(!authenticate_hook(
            &tokens(),
            &hook("other", "out-secret", "bot c")
        ));
    }

    #[test]
    fn test_hook_requires_text() {
        assert!(!authenticate_hook(
            &tokens(),
            &hook("dingo-tiles", "out-secret", "")
        ));
    }
}
