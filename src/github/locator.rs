//! Repository coordinates and identity wrappers for the provider gateway.

use url::Url;

use super::error::ProviderError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, ProviderError> {
        if value.trim().is_empty() {
            return Err(ProviderError::InvalidRepository {
                message: "repository owner must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, ProviderError> {
        if value.trim().is_empty() {
            return Err(ProviderError::InvalidRepository {
                message: "repository name must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ProviderError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProviderError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL from a host string.
///
/// `github.com` maps to the public REST endpoint; any other host is treated
/// as a GitHub Enterprise instance with its API under `/api/v3`.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, ProviderError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| ProviderError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| ProviderError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| ProviderError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Derives the GitHub API base URL from a parsed URL.
fn derive_api_base(parsed: &Url) -> Result<Url, ProviderError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| ProviderError::InvalidUrl("URL must include a host".to_owned()))?;

    derive_api_base_from_host(parsed.scheme(), host, parsed.port())
}

/// Repository coordinates with a derived API base.
///
/// # Example
///
/// ```
/// use prodder::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::from_owner_repo("acme", "widgets")
///     .expect("should create repository locator");
/// assert_eq!(locator.full_name(), "acme/widgets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator from owner and repository name strings.
    ///
    /// Uses `github.com` as the default host.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRepository` when owner or name is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, ProviderError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let api_base = Url::parse("https://api.github.com")
            .map_err(|error| ProviderError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Parses a repository URL in the form `https://<host>/<owner>/<repo>`,
    /// deriving the API base from the host (GitHub Enterprise hosts get
    /// `/api/v3`).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` when parsing fails or
    /// `InvalidRepository` when the path does not contain owner and name
    /// segments.
    pub fn parse(input: &str) -> Result<Self, ProviderError> {
        let parsed =
            Url::parse(input).map_err(|error| ProviderError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed.path_segments().ok_or_else(missing_segments)?;

        let owner_segment = segments.next().ok_or_else(missing_segments)?;
        let repository_segment = segments.next().ok_or_else(missing_segments)?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;
        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// The `owner/name` display form used in logs and notification titles.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    /// Returns the API path for listing pull requests.
    pub(crate) fn pulls_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

fn missing_segments() -> ProviderError {
    ProviderError::InvalidRepository {
        message: "repository URL must match /owner/repo".to_owned(),
    }
}
