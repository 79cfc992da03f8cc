//! Command payloads received from Slack.

use serde::{Deserialize, Serialize};

/// Fields Slack posts for slash commands and outgoing webhooks.
///
/// Both callback kinds share this shape. Slash commands fill in `command`
/// and `response_url`, outgoing webhooks fill in `trigger_word`. Anything
/// Slack omits deserializes as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub timestamp: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub trigger_word: String,
    pub service_id: String,
    pub command: String,
    pub response_url: String,
    /// Resolved robot name. Never taken from the request body.
    #[serde(skip_deserializing)]
    pub robot: String,
}

impl Payload {
    /// Resolve the robot for a slash command: `/download-prometheus` names
    /// the `download-prometheus` robot.
    #[must_use]
    pub fn from_slash_command(mut self) -> Self {
        self.robot = self
            .command
            .strip_prefix('/')
            .unwrap_or(&self.command)
            .to_string();
        self
    }

    /// Resolve the robot for an outgoing webhook.
    ///
    /// The message text looks like `<trigger> <robot> <args...>`. The trigger
    /// word is removed, the first remaining word becomes the robot and the
    /// rest becomes the text handed to it.
    #[must_use]
    pub fn from_outgoing_webhook(mut self) -> Self {
        let trigger = format!("{} ", self.trigger_word);
        let command = self.text.strip_prefix(&trigger).unwrap_or(&self.text);

        let mut words = command.split(' ');
        let robot = words.next().unwrap_or_default().to_string();
        let text = words.collect::<Vec<_>>().join(" ");

        self.robot = robot;
        self.text = text;
        self
    }
}
