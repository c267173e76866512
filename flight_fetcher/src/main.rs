#[warn(clippy::pedantic)]
mod airlabs;
mod error;
mod location;
mod server;

use crate::airlabs::AirLabsGateway;
use crate::error::MainError;
use crate::location::ConfigLocationProvider;
use crate::server::AppState;
use shared::error::InitializationError;
use shared::{FetcherConfig, load_config, shutdown_listener};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracker::gateway::{LocationError, LocationProvider};
use tracker::orchestrator::FetchOrchestrator;

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(InitializationError::Tracing)?;

    // Set up config
    let config = load_config().unwrap_or_else(|e| {
        error!(error = ?e, "configuration could not be initialized");
        panic!("configuration could not be initialized");
    });

    let gateway = AirLabsGateway::new(&config.airlabs)?;
    let orchestrator = Arc::new(FetchOrchestrator::new(gateway));
    let region_events = orchestrator.region_debouncer();

    // Acquire the device location once at startup; denial is non-fatal and
    // leaves the placeholder viewport in effect.
    let provider = ConfigLocationProvider::new(config.location);
    let coords = match provider.current_coordinates().await {
        Ok(coords) => Some(coords),
        Err(LocationError::Denied) => {
            info!("no location configured, keeping the placeholder viewport");
            None
        }
    };
    orchestrator.on_location_acquired(coords).await;
    info!(count = orchestrator.flights().len(), "initialized flight tracker");

    // Cancellation token shared across tasks; listener cancels on SIGINT/SIGTERM.
    let shutdown_token = CancellationToken::new();
    let signal_handle = tokio::spawn(shutdown_listener(Some(shutdown_token.clone())));

    let server_handle = tokio::spawn(server::run(
        AppState {
            orchestrator: Arc::clone(&orchestrator),
            region_events,
        },
        shutdown_token.clone(),
    ));

    let refresh_handle = tokio::spawn(refresh_loop(
        Arc::clone(&orchestrator),
        config.fetcher,
        shutdown_token.clone(),
    ));

    tokio::select! {
        res = server_handle => {
            shutdown_token.cancel();
            res??;
        }
        res = refresh_handle => {
            shutdown_token.cancel();
            res?;
        }
        res = signal_handle => {
            shutdown_token.cancel();
            res?;
        }
    }

    Ok(())
}

/// Periodically re-issues the fetch for the current viewport or search so
/// the displayed set does not go stale between triggers. Disabled when the
/// `[fetcher]` config section is absent.
async fn refresh_loop(
    orchestrator: Arc<FetchOrchestrator<AirLabsGateway>>,
    config: Option<FetcherConfig>,
    shutdown: CancellationToken,
) {
    let Some(config) = config else {
        shutdown.cancelled().await;
        return;
    };

    let interval = Duration::from_secs(config.interval_seconds);
    info!(interval_seconds = config.interval_seconds, "starting background refresh loop");
    loop {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = shutdown.cancelled() => {
                info!("shutdown requested, exiting refresh loop");
                break;
            }
        }

        orchestrator.refresh_current().await;
    }
}
