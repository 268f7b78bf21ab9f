//! Staleness predicate for normalised events.

/// Returns true when an open pull request is old enough to notify about.
///
/// The comparison is strict: a pull request whose age equals the threshold is
/// not yet notified. Negative ages (clock skew between the provider and this
/// host) are never eligible.
#[must_use]
pub const fn is_eligible(age_in_days: i64, threshold_days: i64) -> bool {
    age_in_days > threshold_days
}
