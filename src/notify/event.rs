//! Normalisation of provider pull request records into canonical events.
//!
//! [`normalize`] is the densest logic in the crate and is deliberately pure:
//! given the same raw record, target, and clock reading it always produces
//! the same event, which keeps the whole contract testable without any HTTP
//! double.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::github::models::{RawBranch, RawPullRequest};

use super::channel::{ChannelTarget, ChannelType};
use super::error::NotifyError;

/// The provider's timestamp layout: ISO-8601 UTC with a literal `Z` suffix.
pub(crate) const PROVIDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One side of a pull request, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Full `owner/name` of the repository holding the branch.
    pub repo: String,
    /// Branch name.
    pub branch: String,
    /// Browsable tree URL for the branch (`{repo_html_url}/tree/{branch}`),
    /// empty when the provider omitted the repository record.
    pub tree_url: String,
}

impl BranchRef {
    fn from_raw(raw: &RawBranch) -> Self {
        let branch = raw.branch.clone().unwrap_or_default();
        let repo = raw.repo_full_name.clone().unwrap_or_default();
        let tree_url = raw
            .repo_html_url
            .as_deref()
            .filter(|html_url| !html_url.is_empty())
            .map(|html_url| format!("{html_url}/tree/{branch}"))
            .unwrap_or_default();

        Self {
            repo,
            branch,
            tree_url,
        }
    }

    /// The `repo:branch` display label used in notification facts.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.repo, self.branch)
    }
}

/// Canonical notification event, built once per eligible pull request and
/// immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    /// `owner/name` of the polled repository.
    pub repo_full_name: String,
    /// Rendered notification title.
    pub title: String,
    /// Provider state of the pull request.
    pub state: String,
    /// Creation time parsed from the provider record.
    pub created_at: DateTime<Utc>,
    /// Whole days elapsed since creation, truncated.
    pub age_in_days: i64,
    /// Author login.
    pub author: String,
    /// Branch the change is proposed from.
    pub head: BranchRef,
    /// Branch the change is proposed into.
    pub base: BranchRef,
    /// HTML URL of the pull request.
    pub html_url: String,
    /// Diff URL of the pull request.
    pub diff_url: String,
    /// Assignee logins, in provider order.
    pub assignees: Vec<String>,
    /// Requested reviewer logins, in provider order.
    pub reviewers: Vec<String>,
    /// Avatar shown alongside the notification.
    pub avatar_url: String,
    /// Webhook address the notification is delivered to.
    pub webhook_url: String,
    /// Payload dialect for the formatter.
    pub channel_type: ChannelType,
}

fn parse_created_at(value: &str) -> Result<DateTime<Utc>, NotifyError> {
    NaiveDateTime::parse_from_str(value, PROVIDER_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|error| NotifyError::MalformedTimestamp {
            value: value.to_owned(),
            message: error.to_string(),
        })
}

/// Maps a raw provider record into a [`NotificationEvent`].
///
/// Age is computed by duration subtraction against `now`, not calendar-day
/// difference, and truncates toward zero. Pure: no clock reads, no I/O.
///
/// # Errors
///
/// Returns [`NotifyError::MalformedTimestamp`] when `created_at` is absent or
/// does not match [`PROVIDER_TIMESTAMP_FORMAT`].
pub fn normalize(
    raw: &RawPullRequest,
    repo_full_name: &str,
    target: &ChannelTarget,
    now: DateTime<Utc>,
) -> Result<NotificationEvent, NotifyError> {
    let raw_created = raw
        .created_at
        .as_deref()
        .ok_or_else(|| NotifyError::MalformedTimestamp {
            value: String::new(),
            message: "created_at is missing".to_owned(),
        })?;
    let created_at = parse_created_at(raw_created)?;
    let age_in_days = (now - created_at).num_days();

    let state = raw.state.clone().unwrap_or_else(|| "open".to_owned());
    let original_title = raw.title.clone().unwrap_or_else(|| "untitled".to_owned());
    let title =
        format!("Pull request - {original_title} is {state} for {age_in_days} days");

    Ok(NotificationEvent {
        repo_full_name: repo_full_name.to_owned(),
        title,
        state,
        created_at,
        age_in_days,
        author: raw.author.clone().unwrap_or_else(|| "unknown".to_owned()),
        head: BranchRef::from_raw(&raw.head),
        base: BranchRef::from_raw(&raw.base),
        html_url: raw.html_url.clone().unwrap_or_default(),
        diff_url: raw.diff_url.clone().unwrap_or_default(),
        assignees: raw.assignees.clone(),
        reviewers: raw.requested_reviewers.clone(),
        avatar_url: target.avatar_url.clone(),
        webhook_url: target.webhook_url.clone(),
        channel_type: target.channel_type,
    })
}
