//! Prodder CLI entrypoint: one notification pass over the configured
//! repositories.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Utc;
use ortho_config::OrthoConfig;
use prodder::{
    EnvSecretStore, NotificationPass, NotifyError, OctocrabRepositoryGateway,
    PersonalAccessToken, ProdderConfig, WebhookClient,
};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prodder=info"));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), NotifyError> {
    let config = load_config()?;
    let repositories = config.load_repositories()?;
    let defaults = config.notification_defaults()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)
        .map_err(|error| NotifyError::Configuration {
            message: error.to_string(),
        })?;

    let gateway = OctocrabRepositoryGateway::for_token(&token).map_err(|error| {
        NotifyError::Configuration {
            message: error.to_string(),
        }
    })?;
    let delivery = WebhookClient::new(config.webhook_timeout())?;
    let secrets = EnvSecretStore::default();

    let pass = NotificationPass::new(&gateway, &delivery, &secrets, &defaults, Utc::now());
    pass.run(&repositories).await;
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`NotifyError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ProdderConfig, NotifyError> {
    ProdderConfig::load().map_err(|error| NotifyError::Configuration {
        message: error.to_string(),
    })
}
