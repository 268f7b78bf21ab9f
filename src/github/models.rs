//! Data models for provider-shaped pull request records.
//!
//! The `Api*` structs mirror the GitHub REST response shape and stay private
//! to the gateway layer; [`RawPullRequest`] is the read-only record handed to
//! the notification core. The `created_at` value is kept as the provider's
//! opaque string so the normaliser owns timestamp parsing and its failure
//! mode.

use serde::Deserialize;

/// Provider-shaped pull request record consumed by the notification core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Creation timestamp as supplied by the provider.
    pub created_at: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Diff URL for the change set.
    pub diff_url: Option<String>,
    /// Assignee logins, in provider order. Empty when nobody is assigned.
    pub assignees: Vec<String>,
    /// Requested reviewer logins, in provider order.
    pub requested_reviewers: Vec<String>,
    /// Branch the change is proposed from.
    pub head: RawBranch,
    /// Branch the change is proposed into.
    pub base: RawBranch,
}

/// One side of a pull request (head or base).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBranch {
    /// Branch name (the provider's `ref` field).
    pub branch: Option<String>,
    /// Full `owner/name` of the repository holding the branch.
    pub repo_full_name: Option<String>,
    /// HTML URL of the repository holding the branch.
    pub repo_html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) created_at: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) html_url: Option<String>,
    pub(super) diff_url: Option<String>,
    #[serde(default)]
    pub(super) assignees: Vec<ApiUser>,
    #[serde(default)]
    pub(super) requested_reviewers: Vec<ApiUser>,
    pub(super) head: Option<ApiBranch>,
    pub(super) base: Option<ApiBranch>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    #[serde(rename = "ref")]
    pub(super) branch: Option<String>,
    pub(super) repo: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) full_name: Option<String>,
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

fn collapse_logins(users: Vec<ApiUser>) -> Vec<String> {
    users.into_iter().filter_map(|user| user.login).collect()
}

impl From<ApiBranch> for RawBranch {
    fn from(value: ApiBranch) -> Self {
        let (repo_full_name, repo_html_url) = value
            .repo
            .map_or((None, None), |repo| (repo.full_name, repo.html_url));
        Self {
            branch: value.branch,
            repo_full_name,
            repo_html_url,
        }
    }
}

impl From<ApiPullRequest> for RawPullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            created_at: value.created_at,
            author: value.user.and_then(|user| user.login),
            html_url: value.html_url,
            diff_url: value.diff_url,
            assignees: collapse_logins(value.assignees),
            requested_reviewers: collapse_logins(value.requested_reviewers),
            head: value.head.map(ApiBranch::into).unwrap_or_default(),
            base: value.base.map(ApiBranch::into).unwrap_or_default(),
        }
    }
}
