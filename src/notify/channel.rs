//! Channel target resolution.
//!
//! Merges a repository's optional overrides with the process-wide defaults
//! into an immutable [`ChannelTarget`], looking the webhook address up
//! through the injected [`SecretStore`]. Resolution is side-effect free: the
//! same inputs always produce the same target, and no state leaks between
//! repositories.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{NotificationDefaults, RepositoryConfig};

use super::error::NotifyError;
use super::secrets::SecretStore;

/// Host substring identifying a Microsoft Teams incoming webhook.
const TEAMS_HOST_MARKER: &str = "office.com";

/// The target chat backend's payload dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Microsoft Teams MessageCard.
    Teams,
    /// Slack Block Kit message.
    Slack,
    /// Flat-text body for any webhook that accepts `{"text": ...}`.
    #[default]
    Generic,
}

impl ChannelType {
    /// Maps a configured channel-type value; unrecognised or missing values
    /// fall back to [`ChannelType::Generic`].
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("teams") => Self::Teams,
            Some(raw) if raw.eq_ignore_ascii_case("slack") => Self::Slack,
            _ => Self::Generic,
        }
    }

    /// Stable display name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::Slack => "slack",
            Self::Generic => "generic",
        }
    }
}

/// The resolved destination for one repository's notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTarget {
    /// Webhook address the payload is posted to.
    pub webhook_url: String,
    /// Avatar image shown alongside the notification.
    pub avatar_url: String,
    /// Payload dialect the formatter must produce.
    pub channel_type: ChannelType,
}

/// Returns true when the webhook URL's host marks a Teams endpoint.
fn is_teams_webhook(webhook_url: &str) -> bool {
    Url::parse(webhook_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.contains(TEAMS_HOST_MARKER)))
        .unwrap_or(false)
}

/// Uses the override when present and non-empty, the default otherwise.
fn pick<'a>(override_value: Option<&'a str>, default_value: &'a str) -> &'a str {
    override_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default_value)
}

/// Resolves the effective (webhook address, avatar, channel type) triple for
/// one repository.
///
/// A webhook URL whose host matches the Teams domain marker forces the Teams
/// dialect regardless of the configured type, so a misconfigured entry still
/// produces a card the endpoint accepts.
///
/// # Errors
///
/// Returns [`NotifyError::UnresolvedChannel`] when the secret store has no
/// address registered for the resolved channel identifier.
pub fn resolve_target(
    repository: &RepositoryConfig,
    defaults: &NotificationDefaults,
    secrets: &dyn SecretStore,
) -> Result<ChannelTarget, NotifyError> {
    let channel = pick(repository.channel.as_deref(), &defaults.channel);
    let avatar = pick(repository.avatar.as_deref(), &defaults.avatar);
    let configured_type = repository
        .channel_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or(defaults.channel_type.as_deref());

    let webhook_url = secrets
        .lookup(channel)
        .map_err(|error| NotifyError::UnresolvedChannel { channel: error.key })?;

    let channel_type = if is_teams_webhook(&webhook_url) {
        ChannelType::Teams
    } else {
        ChannelType::from_config(configured_type)
    };

    Ok(ChannelTarget {
        webhook_url,
        avatar_url: avatar.to_owned(),
        channel_type,
    })
}
