pub mod airlabs;

use crate::error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const ENV_VAR_PREFIX: &str = "FLIGHT_TRACKER__";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub airlabs: AirLabsConfig,
    pub fetcher: Option<FetcherConfig>,
    pub location: Option<LocationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirLabsConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Periodic background refresh of the current viewport or search. Absent
/// section means fetches are trigger-driven only.
#[derive(Debug, Deserialize, Clone)]
pub struct FetcherConfig {
    pub interval_seconds: u64,
}

/// Fixed device location. Absent section is treated as a denied location
/// permission and the placeholder viewport stays in effect.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(name: "signal.ctrlc.received", "received Ctrl+C signal, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] crate::error::ConfigError),
    }
}
