//! The sequential notification pass.
//!
//! Wires the gateway, resolver, normaliser, staleness filter, formatter, and
//! delivery client together for one poll over the configured repositories.
//! Failures are isolated at the smallest granularity that keeps the pass
//! moving: a repository that cannot be resolved or listed is skipped, a pull
//! request with a malformed timestamp is skipped, and a failed delivery only
//! affects its own notification.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::{NotificationDefaults, RepositoryConfig};
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::RawPullRequest;

use super::channel::{ChannelTarget, resolve_target};
use super::delivery::PayloadDelivery;
use super::event::normalize;
use super::format::format_payload;
use super::secrets::SecretStore;
use super::staleness::is_eligible;

/// Counters describing one completed notification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Deliveries acknowledged with a 2xx status.
    pub notified: usize,
    /// Deliveries answered with a non-2xx status.
    pub rejected: usize,
    /// Deliveries that failed at the transport level.
    pub failed: usize,
    /// Pull requests not notified (not open, not stale, or malformed).
    pub skipped: usize,
}

/// One poll pass over the configured repositories.
pub struct NotificationPass<'collab, Gateway, Delivery>
where
    Gateway: RepositoryGateway,
    Delivery: PayloadDelivery,
{
    gateway: &'collab Gateway,
    delivery: &'collab Delivery,
    secrets: &'collab dyn SecretStore,
    defaults: &'collab NotificationDefaults,
    threshold_days: i64,
    now: DateTime<Utc>,
}

impl<'collab, Gateway, Delivery> NotificationPass<'collab, Gateway, Delivery>
where
    Gateway: RepositoryGateway,
    Delivery: PayloadDelivery,
{
    /// Creates a pass over the given collaborators, pinned to one clock
    /// reading so every pull request in the pass ages consistently.
    #[must_use]
    pub fn new(
        gateway: &'collab Gateway,
        delivery: &'collab Delivery,
        secrets: &'collab dyn SecretStore,
        defaults: &'collab NotificationDefaults,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            gateway,
            delivery,
            secrets,
            defaults,
            threshold_days: i64::from(defaults.stale_days),
            now,
        }
    }

    /// Polls each repository in order and delivers notifications for its
    /// stale open pull requests.
    pub async fn run(&self, repositories: &[RepositoryConfig]) -> PassSummary {
        let mut summary = PassSummary::default();

        info!(
            repositories = repositories.len(),
            threshold_days = self.threshold_days,
            "starting notification pass"
        );

        for repository in repositories {
            self.process_repository(repository, &mut summary).await;
        }

        info!(
            notified = summary.notified,
            rejected = summary.rejected,
            failed = summary.failed,
            skipped = summary.skipped,
            "notification pass complete"
        );

        summary
    }

    async fn process_repository(&self, repository: &RepositoryConfig, summary: &mut PassSummary) {
        let locator = match RepositoryLocator::from_owner_repo(&repository.owner, &repository.name)
        {
            Ok(locator) => locator,
            Err(error) => {
                warn!(
                    owner = %repository.owner,
                    name = %repository.name,
                    %error,
                    "skipping repository with invalid coordinates"
                );
                return;
            }
        };
        let full_name = locator.full_name();

        let target = match resolve_target(repository, self.defaults, self.secrets) {
            Ok(target) => target,
            Err(error) => {
                warn!(repository = %full_name, %error, "skipping repository without a routable channel");
                return;
            }
        };

        info!(
            repository = %full_name,
            channel_type = target.channel_type.as_str(),
            "polling repository"
        );

        let pulls = match self.gateway.list_open_pull_requests(&locator).await {
            Ok(pulls) => pulls,
            Err(error) => {
                warn!(repository = %full_name, %error, "provider listing failed; skipping repository");
                return;
            }
        };

        for pull in &pulls {
            self.notify_pull(pull, &full_name, &target, summary).await;
        }
    }

    async fn notify_pull(
        &self,
        pull: &RawPullRequest,
        full_name: &str,
        target: &ChannelTarget,
        summary: &mut PassSummary,
    ) {
        if pull.state.as_deref() != Some("open") {
            summary.skipped += 1;
            return;
        }

        let event = match normalize(pull, full_name, target, self.now) {
            Ok(event) => event,
            Err(error) => {
                warn!(repository = full_name, number = pull.number, %error, "skipping pull request");
                summary.skipped += 1;
                return;
            }
        };

        if event.age_in_days < 0 {
            warn!(
                repository = full_name,
                number = pull.number,
                age_in_days = event.age_in_days,
                "pull request appears to be from the future; treating as not stale"
            );
            summary.skipped += 1;
            return;
        }

        if !is_eligible(event.age_in_days, self.threshold_days) {
            summary.skipped += 1;
            return;
        }

        let payload = format_payload(&event);
        match self.delivery.deliver(&event.webhook_url, &payload).await {
            Ok(outcome) if outcome.is_success() => {
                info!(
                    repository = full_name,
                    number = pull.number,
                    status = outcome.status.as_u16(),
                    "notification delivered"
                );
                summary.notified += 1;
            }
            Ok(outcome) => {
                info!(
                    repository = full_name,
                    number = pull.number,
                    status = outcome.status.as_u16(),
                    "webhook answered with a non-success status"
                );
                summary.rejected += 1;
            }
            Err(error) => {
                warn!(repository = full_name, number = pull.number, %error, "webhook delivery failed");
                summary.failed += 1;
            }
        }
    }
}
