//! Gateways for listing pull requests through Octocrab.
//!
//! This module provides the trait-based gateway the notification pass polls
//! for raw pull requests. The trait-based design enables mocking in tests
//! while the Octocrab implementation handles real HTTP requests.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::Octocrab;
use url::Url;

use super::error::ProviderError;
use super::locator::{PersonalAccessToken, RepositoryLocator};
use super::models::{ApiPullRequest, RawPullRequest};

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ProviderError::InvalidUrl` when the base URI cannot be parsed or
/// `ProviderError::Api` when Octocrab fails to construct a client.
fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ProviderError> {
    let base_uri: http::Uri = api_base
        .parse::<http::Uri>()
        .map_err(|error| ProviderError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| ProviderError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Gateway that can list the open pull requests of a repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch the open pull requests for the repository, in provider order.
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<RawPullRequest>, ProviderError>;
}

/// Octocrab-backed repository gateway.
pub struct OctocrabRepositoryGateway {
    client: Octocrab,
}

impl OctocrabRepositoryGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway for the given token against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken) -> Result<Self, ProviderError> {
        let octocrab = build_octocrab_client(token, "https://api.github.com")?;
        Ok(Self::new(octocrab))
    }

    /// Builds a gateway for the given token and explicit API base, as derived
    /// by [`RepositoryLocator::api_base`] for Enterprise hosts.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` when the base URI cannot be parsed
    /// or `ProviderError::Api` when Octocrab fails to construct a client.
    pub fn for_token_with_base(
        token: &PersonalAccessToken,
        api_base: &Url,
    ) -> Result<Self, ProviderError> {
        let octocrab = build_octocrab_client(token, api_base.as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabRepositoryGateway {
    async fn list_open_pull_requests(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<RawPullRequest>, ProviderError> {
        let query_params = [("state", "open")];

        self.client
            .get::<Vec<ApiPullRequest>, _, _>(locator.pulls_path(), Some(&query_params))
            .await
            .map(|pulls| pulls.into_iter().map(ApiPullRequest::into).collect())
            .map_err(|error| map_octocrab_error("list pulls", &error))
    }
}

// --- Error mapping helpers ---

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ProviderError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            ProviderError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            ProviderError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return ProviderError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ProviderError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{OctocrabRepositoryGateway, ProviderError, RepositoryGateway};
    use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

    fn gateway_against(server: &MockServer) -> (OctocrabRepositoryGateway, RepositoryLocator) {
        let locator = RepositoryLocator::parse(&format!("{}/acme/widgets", server.uri()))
            .expect("should create repository locator");
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let gateway = OctocrabRepositoryGateway::for_token_with_base(&token, locator.api_base())
            .expect("should create gateway");
        (gateway, locator)
    }

    #[tokio::test]
    async fn list_open_pull_requests_queries_open_state_and_maps_items() {
        let server = MockServer::start().await;
        let (gateway, locator) = gateway_against(&server);

        let response = ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "number": 1,
            "title": "First PR",
            "state": "open",
            "created_at": "2026-07-01T00:00:00Z",
            "user": { "login": "octocat" },
            "html_url": "https://github.com/acme/widgets/pull/1",
            "diff_url": "https://github.com/acme/widgets/pull/1.diff",
            "assignees": [],
            "requested_reviewers": [],
            "head": { "ref": "topic", "repo": { "full_name": "acme/widgets", "html_url": "https://github.com/acme/widgets" } },
            "base": { "ref": "main", "repo": { "full_name": "acme/widgets", "html_url": "https://github.com/acme/widgets" } }
        }]));

        Mock::given(method("GET"))
            .and(path("/api/v3/repos/acme/widgets/pulls"))
            .and(query_param("state", "open"))
            .respond_with(response)
            .mount(&server)
            .await;

        let pulls = gateway
            .list_open_pull_requests(&locator)
            .await
            .expect("request should succeed");

        assert_eq!(pulls.len(), 1, "expected one item");
        let first = pulls.first().expect("should have first item");
        assert_eq!(first.number, 1);
        assert_eq!(first.author.as_deref(), Some("octocat"));
        assert!(first.assignees.is_empty(), "assignees should stay empty");
    }

    #[tokio::test]
    async fn list_open_pull_requests_maps_auth_failures() {
        let server = MockServer::start().await;
        let (gateway, locator) = gateway_against(&server);

        let response = ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        }));

        Mock::given(method("GET"))
            .and(path("/api/v3/repos/acme/widgets/pulls"))
            .respond_with(response)
            .mount(&server)
            .await;

        let error = gateway
            .list_open_pull_requests(&locator)
            .await
            .expect_err("request should fail");

        assert!(
            matches!(error, ProviderError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }

    #[tokio::test]
    async fn list_open_pull_requests_maps_server_errors_to_api() {
        let server = MockServer::start().await;
        let (gateway, locator) = gateway_against(&server);

        let response = ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "boom",
            "documentation_url": "https://docs.github.com/rest"
        }));

        Mock::given(method("GET"))
            .and(path("/api/v3/repos/acme/widgets/pulls"))
            .respond_with(response)
            .mount(&server)
            .await;

        let error = gateway
            .list_open_pull_requests(&locator)
            .await
            .expect_err("request should fail");

        assert!(
            matches!(error, ProviderError::Api { .. }),
            "expected Api, got {error:?}"
        );
    }
}
