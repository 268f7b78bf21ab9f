//! Prodder library crate providing stale pull request notifications.
//!
//! The library wraps Octocrab to list the open pull requests of a configured
//! set of repositories, normalises them into notification events, filters by
//! a staleness threshold, and posts channel-specific payloads (Teams, Slack,
//! or generic text) to chat webhooks with observable per-attempt outcomes.

pub mod config;
pub mod github;
pub mod notify;

pub use config::{NotificationDefaults, ProdderConfig, RepositoryConfig};
pub use github::{
    OctocrabRepositoryGateway, PersonalAccessToken, ProviderError, RawPullRequest,
    RepositoryGateway, RepositoryLocator,
};
pub use notify::{
    ChannelTarget, ChannelType, DeliveryOutcome, EnvSecretStore, FormattedPayload,
    InMemorySecretStore, NotificationEvent, NotificationPass, NotifyError, PassSummary,
    PayloadDelivery, SecretStore, WebhookClient,
};
