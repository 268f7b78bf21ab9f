//! GitHub pull request polling and token validation.
//!
//! This module wraps Octocrab to validate repository coordinates and personal
//! access tokens and to list the open pull requests the notification core
//! consumes. Errors are mapped into user-friendly variants so that callers
//! can surface precise failures without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;

pub use error::ProviderError;
pub use gateway::{OctocrabRepositoryGateway, RepositoryGateway};
pub use locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{RawBranch, RawPullRequest};

#[cfg(test)]
pub use gateway::MockRepositoryGateway;
