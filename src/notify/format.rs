//! Payload formatting for the supported webhook dialects.
//!
//! All three variants render the same six facts in the same order — User,
//! Created, Head, Base, Pull Request, Diff URL — extracted once by
//! [`facts`]; only the envelope differs per [`ChannelType`]. The Teams
//! MessageCard keeps the exact field set legacy Teams connectors expect.

use serde_json::{Value, json};

use super::channel::ChannelType;
use super::event::{NotificationEvent, PROVIDER_TIMESTAMP_FORMAT};

/// Content type sent with every webhook body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Accent colour of the Teams MessageCard.
const TEAMS_THEME_COLOR: &str = "0076D7";

/// A rendered wire body plus the content type it must be posted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPayload {
    /// Serialised request body.
    pub body: String,
    /// Value for the `Content-Type` header.
    pub content_type: &'static str,
}

/// Extracts the six facts shared by every payload variant, in wire order.
fn facts(event: &NotificationEvent) -> [(&'static str, String); 6] {
    [
        ("User", event.author.clone()),
        (
            "Created",
            event.created_at.format(PROVIDER_TIMESTAMP_FORMAT).to_string(),
        ),
        ("Head", event.head.label()),
        ("Base", event.base.label()),
        ("Pull Request", event.html_url.clone()),
        ("Diff URL", event.diff_url.clone()),
    ]
}

fn teams_card(event: &NotificationEvent) -> Value {
    let fact_objects: Vec<Value> = facts(event)
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();

    json!({
        "@type": "MessageCard",
        "@context": "http://schema.org/extensions",
        "themeColor": TEAMS_THEME_COLOR,
        "summary": event.repo_full_name,
        "sections": [{
            "activityTitle": event.repo_full_name,
            "activitySubtitle": event.title,
            "activityImage": event.avatar_url,
            "facts": fact_objects,
            "markdown": true
        }]
    })
}

fn slack_blocks(event: &NotificationEvent) -> Value {
    let fact_lines: Vec<String> = facts(event)
        .into_iter()
        .map(|(label, value)| format!("*{label}*: {value}"))
        .collect();

    json!({
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": event.title }
            },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": fact_lines.join("\n") },
                "accessory": {
                    "type": "image",
                    "image_url": event.avatar_url,
                    "alt_text": event.repo_full_name
                }
            }
        ]
    })
}

fn generic_text(event: &NotificationEvent) -> Value {
    let fact_lines: Vec<String> = facts(event)
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect();

    json!({ "text": fact_lines.join("\n") })
}

/// Renders the wire body for the event's channel type.
#[must_use]
pub fn format_payload(event: &NotificationEvent) -> FormattedPayload {
    let body = match event.channel_type {
        ChannelType::Teams => teams_card(event),
        ChannelType::Slack => slack_blocks(event),
        ChannelType::Generic => generic_text(event),
    };

    FormattedPayload {
        body: body.to_string(),
        content_type: CONTENT_TYPE_JSON,
    }
}
