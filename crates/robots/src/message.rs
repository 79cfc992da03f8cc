//! Slack message bodies for incoming webhooks and slash command responses.

use serde::{Deserialize, Serialize};

/// How Slack should treat names and links in the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStyle {
    /// Linkify channel and user names.
    Full,
    /// Leave the text as sent.
    None,
}

/// Who sees a slash command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only the user who ran the command.
    Ephemeral,
    /// Everyone in the channel.
    InChannel,
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<ParseStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrkdwn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create a message with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn icon_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(emoji.into());
        self
    }

    #[must_use]
    pub fn unfurl_links(mut self, unfurl: bool) -> Self {
        self.unfurl_links = Some(unfurl);
        self
    }

    #[must_use]
    pub fn parse(mut self, style: ParseStyle) -> Self {
        self.parse = Some(style);
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Legacy message attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<AttachmentField>,
}

/// Name/value pair rendered in an attachment table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_omitted() {
        let message = Message::new("hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({ "text": "hello" }));
    }

    #[test]
    fn test_builder_fields_serialized() {
        let message = Message::new("Download ready")
            .channel("C123")
            .username("dingobot")
            .icon_emoji(":dingo:")
            .unfurl_links(false)
            .parse(ParseStyle::Full)
            .response_type(ResponseType::InChannel);

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "channel": "C123",
                "username": "dingobot",
                "text": "Download ready",
                "icon_emoji": ":dingo:",
                "unfurl_links": false,
                "parse": "full",
                "response_type": "in_channel"
            })
        );
    }

    #[test]
    fn test_attachment_serialization() {
        let message = Message::new("release").attachment(Attachment {
            fallback: "v1.2.3".to_string(),
            color: Some("#3498db".to_string()),
            fields: vec![AttachmentField {
                title: "Version".to_string(),
                value: "1.2.3".to_string(),
                short: true,
            }],
            ..Attachment::default()
        });

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["attachments"][0]["color"], "#3498db");
        assert_eq!(value["attachments"][0]["fields"][0]["short"], true);
        assert!(value["attachments"][0].get("title").is_none());
    }
}
