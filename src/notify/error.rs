//! Error types exposed by the notification core.

use thiserror::Error;

/// Errors surfaced while resolving, normalising, or delivering notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// A required configuration value was missing or invalid. Fatal: the
    /// pass refuses to start without complete defaults.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The resolved channel identifier has no registered webhook address.
    /// Skips the affected repository only.
    #[error("no webhook address registered for channel `{channel}`")]
    UnresolvedChannel {
        /// The channel identifier that failed to resolve.
        channel: String,
    },

    /// The provider's `created_at` value did not match the expected
    /// `YYYY-MM-DDTHH:MM:SSZ` layout. Skips the affected pull request only.
    #[error("malformed created_at timestamp `{value}`: {message}")]
    MalformedTimestamp {
        /// The raw timestamp as received from the provider.
        value: String,
        /// Parser detail describing the mismatch.
        message: String,
    },

    /// Transport-level failure reaching a webhook (DNS, refused connection,
    /// timeout). Non-2xx responses are not errors; they are reported through
    /// the delivery outcome instead.
    #[error("webhook delivery failed: {message}")]
    Delivery {
        /// Transport error detail.
        message: String,
    },
}
