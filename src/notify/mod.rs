//! Notification dispatch and formatting core.
//!
//! Given raw pull request records from the provider gateway, this module
//! resolves the destination channel, normalises each record into a
//! [`NotificationEvent`], filters by staleness, renders the channel-specific
//! payload, and delivers it — reporting per-attempt outcomes for logging.

pub mod channel;
pub mod delivery;
pub mod error;
pub mod event;
pub mod format;
pub mod pass;
pub mod secrets;
pub mod staleness;

pub use channel::{ChannelTarget, ChannelType, resolve_target};
pub use delivery::{DeliveryOutcome, PayloadDelivery, WebhookClient};
pub use error::NotifyError;
pub use event::{BranchRef, NotificationEvent, normalize};
pub use format::{FormattedPayload, format_payload};
pub use pass::{NotificationPass, PassSummary};
pub use secrets::{EnvSecretStore, InMemorySecretStore, SecretNotFound, SecretStore};
pub use staleness::is_eligible;

#[cfg(test)]
pub use delivery::MockPayloadDelivery;
