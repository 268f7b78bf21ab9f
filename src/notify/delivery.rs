//! Webhook delivery client.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use reqwest::Client;

use super::error::NotifyError;
use super::format::FormattedPayload;

/// Default timeout applied to webhook POSTs.
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 20;

/// Outcome of a single delivery attempt.
///
/// Carries the raw status code so the caller can log non-2xx responses
/// without treating them as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// HTTP status code returned by the webhook endpoint.
    pub status: StatusCode,
}

impl DeliveryOutcome {
    /// True when the endpoint answered with a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Capability for posting a formatted payload to a webhook address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayloadDelivery: Send + Sync {
    /// Posts `payload` to `webhook_url` once, with no retries.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Delivery`] on transport failures only; non-2xx
    /// responses surface through the returned [`DeliveryOutcome`].
    async fn deliver(
        &self,
        webhook_url: &str,
        payload: &FormattedPayload,
    ) -> Result<DeliveryOutcome, NotifyError>;
}

/// Reqwest-backed webhook client.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    /// Creates a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build().map_err(|error| {
            NotifyError::Configuration {
                message: format!("failed to configure webhook HTTP client: {error}"),
            }
        })?;
        Ok(Self { client })
    }

    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn with_default_timeout() -> Result<Self, NotifyError> {
        Self::new(Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS))
    }
}

#[async_trait]
impl PayloadDelivery for WebhookClient {
    async fn deliver(
        &self,
        webhook_url: &str,
        payload: &FormattedPayload,
    ) -> Result<DeliveryOutcome, NotifyError> {
        let response = self
            .client
            .post(webhook_url)
            .header(CONTENT_TYPE, payload.content_type)
            .body(payload.body.clone())
            .send()
            .await
            .map_err(|error| NotifyError::Delivery {
                message: format!("POST {webhook_url} failed: {error}"),
            })?;

        Ok(DeliveryOutcome {
            status: response.status(),
        })
    }
}
