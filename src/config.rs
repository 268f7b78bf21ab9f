//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prodder.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRODDER_TOKEN`, `PRODDER_STALE_DAYS`, or
//!    legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--stale-days`/`-s`, ...
//!
//! # Configuration File
//!
//! Place `.prodder.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! token = "ghp_example"
//! stale_days = 3
//! default_channel = "general"
//! default_avatar = "https://img.example.com/bot.png"
//! default_channel_type = "slack"
//! repositories_file = "repositories.toml"
//! ```
//!
//! The repository roster lives in its own TOML file so the watched list can
//! be maintained separately from credentials and defaults:
//!
//! ```toml
//! [[repositories]]
//! owner = "acme"
//! name = "widgets"
//! channel = "widgets-alerts"
//! channel_type = "slack"
//!
//! [[repositories]]
//! owner = "umbrella"
//! name = "gears"
//! ```

use std::env;
use std::fs;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::notify::error::NotifyError;

/// Watched repository entry from the roster file. Optional fields override
/// the process-wide notification defaults for this repository only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryConfig {
    /// Repository owner (e.g. "acme").
    pub owner: String,
    /// Repository name (e.g. "widgets").
    pub name: String,
    /// Channel identifier override.
    #[serde(default)]
    pub channel: Option<String>,
    /// Avatar URL override.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Channel type override (`teams`, `slack`, or anything else for the
    /// generic payload).
    #[serde(default)]
    pub channel_type: Option<String>,
}

/// Process-wide notification defaults resolved from [`ProdderConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDefaults {
    /// Channel identifier used when a repository has no override.
    pub channel: String,
    /// Avatar URL used when a repository has no override.
    pub avatar: String,
    /// Channel type used when a repository has no override.
    pub channel_type: Option<String>,
    /// Days an open pull request must exceed before it is notified.
    pub stale_days: u32,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRODDER_TOKEN`, `GITHUB_TOKEN` (legacy), or `--token`: provider token
/// - `PRODDER_STALE_DAYS` or `--stale-days`: staleness threshold in days
/// - `PRODDER_DEFAULT_CHANNEL` or `--default-channel`: default channel
/// - `PRODDER_DEFAULT_AVATAR` or `--default-avatar`: default avatar URL
/// - `PRODDER_DEFAULT_CHANNEL_TYPE` or `--default-channel-type`: default
///   payload dialect
/// - `PRODDER_REPOSITORIES_FILE` or `--repositories-file`: roster file path
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRODDER",
    discovery(
        dotfile_name = ".prodder.toml",
        config_file_name = "prodder.toml",
        app_name = "prodder"
    )
)]
pub struct ProdderConfig {
    /// Personal access token for provider API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRODDER_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Path of the TOML roster file listing the watched repositories.
    ///
    /// Defaults to `repositories.toml` in the working directory.
    #[ortho_config(cli_short = 'r')]
    pub repositories_file: Option<String>,

    /// Days an open pull request must exceed before it is notified.
    ///
    /// Required; the pass refuses to start without a threshold.
    #[ortho_config(cli_short = 's')]
    pub stale_days: Option<u32>,

    /// Channel identifier used when a repository has no override.
    #[ortho_config()]
    pub default_channel: Option<String>,

    /// Avatar URL used when a repository has no override.
    #[ortho_config()]
    pub default_avatar: Option<String>,

    /// Channel type used when a repository has no override. Unrecognised
    /// values select the generic payload.
    #[ortho_config()]
    pub default_channel_type: Option<String>,

    /// Timeout for webhook POSTs, in seconds.
    #[ortho_config()]
    pub webhook_timeout_seconds: u64,
}

const DEFAULT_ROSTER_FILE: &str = "repositories.toml";
const DEFAULT_WEBHOOK_TIMEOUT_SECONDS: u64 = 20;

impl Default for ProdderConfig {
    fn default() -> Self {
        Self {
            token: None,
            repositories_file: None,
            stale_days: None,
            default_channel: None,
            default_avatar: None,
            default_channel_type: None,
            webhook_timeout_seconds: DEFAULT_WEBHOOK_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RosterFile {
    #[serde(default)]
    repositories: Vec<RepositoryConfig>,
}

fn require_non_empty(value: Option<&str>, description: &str) -> Result<String, NotifyError> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| NotifyError::Configuration {
            message: format!("{description} is required"),
        })
}

impl ProdderConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, NotifyError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or_else(|| NotifyError::Configuration {
                message: "provider token is required (use --token, PRODDER_TOKEN, or GITHUB_TOKEN)"
                    .to_owned(),
            })
    }

    /// Resolves the process-wide notification defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the default channel,
    /// default avatar, or staleness threshold is missing.
    pub fn notification_defaults(&self) -> Result<NotificationDefaults, NotifyError> {
        let channel = require_non_empty(
            self.default_channel.as_deref(),
            "default_channel (--default-channel)",
        )?;
        let avatar = require_non_empty(
            self.default_avatar.as_deref(),
            "default_avatar (--default-avatar)",
        )?;
        let stale_days = self.stale_days.ok_or_else(|| NotifyError::Configuration {
            message: "stale_days is required (use --stale-days, PRODDER_STALE_DAYS, or stale_days in .prodder.toml)"
                .to_owned(),
        })?;

        Ok(NotificationDefaults {
            channel,
            avatar,
            channel_type: self
                .default_channel_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
            stale_days,
        })
    }

    /// Loads the ordered repository roster from the configured TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the roster file cannot be
    /// read or parsed.
    pub fn load_repositories(&self) -> Result<Vec<RepositoryConfig>, NotifyError> {
        let path = self
            .repositories_file
            .as_deref()
            .unwrap_or(DEFAULT_ROSTER_FILE);

        let contents = fs::read_to_string(path).map_err(|error| NotifyError::Configuration {
            message: format!("failed to read repository roster `{path}`: {error}"),
        })?;

        let roster: RosterFile =
            toml::from_str(&contents).map_err(|error| NotifyError::Configuration {
                message: format!("failed to parse repository roster `{path}`: {error}"),
            })?;

        Ok(roster.repositories)
    }

    /// Timeout applied to webhook POSTs.
    #[must_use]
    pub const fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use ortho_config::MergeComposer;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::notify::error::NotifyError;

    use super::{NotificationDefaults, ProdderConfig};

    /// Applies a configuration layer to the composer based on the layer type.
    fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
        match layer_type {
            "defaults" => composer.push_defaults(value),
            "file" => composer.push_file(value, None),
            "environment" => composer.push_environment(value),
            "cli" => composer.push_cli(value),
            _ => panic!("unknown layer type: {layer_type}"),
        }
    }

    #[rstest]
    #[case::file_overrides_defaults(
        vec![("defaults", json!({"default_channel": "default"})), ("file", json!({"default_channel": "file"}))],
        "file",
        "file should override default"
    )]
    #[case::environment_overrides_file(
        vec![("file", json!({"default_channel": "file"})), ("environment", json!({"default_channel": "env"}))],
        "env",
        "environment should override file"
    )]
    #[case::cli_overrides_environment(
        vec![("environment", json!({"default_channel": "env"})), ("cli", json!({"default_channel": "cli"}))],
        "cli",
        "CLI should override environment"
    )]
    fn test_layer_precedence(
        #[case] layers: Vec<(&str, Value)>,
        #[case] expected: &str,
        #[case] message: &str,
    ) {
        let mut composer = MergeComposer::new();

        for (layer_type, value) in layers {
            apply_layer(&mut composer, layer_type, value);
        }

        let config =
            ProdderConfig::merge_from_layers(composer.layers()).expect("merge should succeed");

        assert_eq!(config.default_channel.as_deref(), Some(expected), "{message}");
    }

    #[rstest]
    fn partial_overrides_preserve_lower_values() {
        let mut composer = MergeComposer::new();
        composer.push_defaults(json!({"default_channel": "general", "stale_days": 3}));
        composer.push_cli(json!({"default_channel": "cli-channel"}));

        let config =
            ProdderConfig::merge_from_layers(composer.layers()).expect("merge should succeed");

        assert_eq!(config.default_channel.as_deref(), Some("cli-channel"));
        assert_eq!(config.stale_days, Some(3), "default threshold should survive");
    }

    #[rstest]
    fn resolve_token_prefers_configured_value() {
        let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
        let config = ProdderConfig {
            token: Some("config-token".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            config.resolve_token().ok().as_deref(),
            Some("config-token"),
            "configured token should win over the environment"
        );
    }

    #[rstest]
    fn resolve_token_falls_back_to_github_token() {
        let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
        let config = ProdderConfig::default();

        assert_eq!(config.resolve_token().ok().as_deref(), Some("env-token"));
    }

    #[rstest]
    fn resolve_token_errors_without_any_source() {
        let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
        let config = ProdderConfig::default();

        let result = config.resolve_token();
        assert!(
            matches!(result, Err(NotifyError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
    }

    fn complete_config() -> ProdderConfig {
        ProdderConfig {
            stale_days: Some(3),
            default_channel: Some("general".to_owned()),
            default_avatar: Some("https://img.example.com/bot.png".to_owned()),
            default_channel_type: Some("slack".to_owned()),
            ..Default::default()
        }
    }

    #[rstest]
    fn notification_defaults_resolve_from_complete_config() {
        let defaults = complete_config()
            .notification_defaults()
            .expect("complete config should resolve");

        assert_eq!(
            defaults,
            NotificationDefaults {
                channel: "general".to_owned(),
                avatar: "https://img.example.com/bot.png".to_owned(),
                channel_type: Some("slack".to_owned()),
                stale_days: 3,
            }
        );
    }

    #[rstest]
    #[case::missing_channel(ProdderConfig { default_channel: None, ..complete_config() })]
    #[case::blank_channel(ProdderConfig { default_channel: Some("  ".to_owned()), ..complete_config() })]
    #[case::missing_avatar(ProdderConfig { default_avatar: None, ..complete_config() })]
    #[case::missing_threshold(ProdderConfig { stale_days: None, ..complete_config() })]
    fn notification_defaults_require_channel_avatar_and_threshold(#[case] config: ProdderConfig) {
        let result = config.notification_defaults();
        assert!(
            matches!(result, Err(NotifyError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
    }

    #[rstest]
    fn blank_channel_type_resolves_to_none() {
        let config = ProdderConfig {
            default_channel_type: Some("   ".to_owned()),
            ..complete_config()
        };

        let defaults = config
            .notification_defaults()
            .expect("config should resolve");
        assert!(defaults.channel_type.is_none(), "blank type should be None");
    }

    #[rstest]
    fn load_repositories_reads_roster_in_order() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("repositories.toml");
        std::fs::write(
            &path,
            r#"
            [[repositories]]
            owner = "acme"
            name = "widgets"
            channel = "widgets-alerts"
            channel_type = "slack"

            [[repositories]]
            owner = "umbrella"
            name = "gears"
            "#,
        )
        .expect("should write roster");

        let config = ProdderConfig {
            repositories_file: Some(path.display().to_string()),
            ..Default::default()
        };

        let repositories = config.load_repositories().expect("roster should load");
        assert_eq!(repositories.len(), 2);

        let first = repositories.first().expect("should have first entry");
        assert_eq!(first.owner, "acme");
        assert_eq!(first.channel.as_deref(), Some("widgets-alerts"));

        let second = repositories.last().expect("should have last entry");
        assert_eq!(second.owner, "umbrella");
        assert!(second.channel.is_none(), "override should be absent");
    }

    #[rstest]
    fn load_repositories_reports_missing_file() {
        let config = ProdderConfig {
            repositories_file: Some("/nonexistent/roster.toml".to_owned()),
            ..Default::default()
        };

        let result = config.load_repositories();
        assert!(
            matches!(result, Err(NotifyError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
    }

    #[rstest]
    fn load_repositories_reports_malformed_roster() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("repositories.toml");
        std::fs::write(&path, "repositories = \"not a table\"").expect("should write roster");

        let config = ProdderConfig {
            repositories_file: Some(path.display().to_string()),
            ..Default::default()
        };

        let result = config.load_repositories();
        assert!(
            matches!(result, Err(NotifyError::Configuration { .. })),
            "expected Configuration, got {result:?}"
        );
    }
}
