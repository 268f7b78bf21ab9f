//! Secret lookup capability for webhook addresses.
//!
//! The channel resolver never reads the environment directly; it goes
//! through the [`SecretStore`] trait so tests and embedders can inject their
//! own mapping.

use std::collections::HashMap;
use std::env;

use thiserror::Error;

/// Returned when a store has no value registered under the requested key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no secret registered under `{key}`")]
pub struct SecretNotFound {
    /// The key that failed to resolve.
    pub key: String,
}

/// Capability for resolving channel identifiers to webhook addresses.
pub trait SecretStore: Send + Sync {
    /// Look up the secret stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretNotFound`] when no value is registered under `key`.
    fn lookup(&self, key: &str) -> Result<String, SecretNotFound>;
}

/// Secret store backed by process environment variables.
///
/// A channel identifier `eng-alerts` resolves through the variable
/// `PRODDER_WEBHOOK_ENG_ALERTS`: the configured prefix, an underscore, and
/// the identifier uppercased with dashes folded to underscores.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    /// Creates a store with a custom variable prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn variable_name(&self, key: &str) -> String {
        let suffix: String = key
            .chars()
            .map(|character| match character {
                '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        format!("{}_{suffix}", self.prefix)
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new("PRODDER_WEBHOOK")
    }
}

impl SecretStore for EnvSecretStore {
    fn lookup(&self, key: &str) -> Result<String, SecretNotFound> {
        env::var(self.variable_name(key))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| SecretNotFound {
                key: key.to_owned(),
            })
    }
}

/// Secret store backed by an in-memory map, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    entries: HashMap<String, String>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `key`, returning the store for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl SecretStore for InMemorySecretStore {
    fn lookup(&self, key: &str) -> Result<String, SecretNotFound> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| SecretNotFound {
                key: key.to_owned(),
            })
    }
}
