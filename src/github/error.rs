//! Error types exposed by the provider gateway layer.

use thiserror::Error;

/// Errors surfaced while validating input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider token was missing or blank.
    #[error("provider access token is required")]
    MissingToken,

    /// A URL could not be parsed.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// Repository coordinates were empty or otherwise unusable.
    #[error("repository coordinates are invalid: {message}")]
    InvalidRepository {
        /// Description of the offending owner/name pair.
        message: String,
    },

    /// The token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },
}
