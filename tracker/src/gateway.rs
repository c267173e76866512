use crate::viewport::{Coordinates, Viewport};
use shared::airlabs::Flight;
use std::future::Future;
use thiserror::Error;

/// What a single orchestration cycle asks the gateway for. Transient: built
/// from the current viewport or query and dropped once the fetch settles.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Region(Viewport),
    Query(String),
}

/// The ways a flight fetch can die. All of them are non-fatal to the
/// controller: the previously committed flight set stays in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("server returned status {0}")]
    Server(u16),
    #[error("payload did not match the expected shape: {0}")]
    BadData(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,
}

/// Network access to the flight data backend. Injected into the
/// orchestrator so tests can script responses deterministically.
pub trait FlightGateway: Send + Sync + 'static {
    fn fetch_by_region(
        &self,
        viewport: &Viewport,
    ) -> impl Future<Output = Result<Vec<Flight>, FetchFailure>> + Send;

    fn fetch_by_query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Flight>, FetchFailure>> + Send;
}

/// Device location acquisition. Denial leaves the placeholder viewport in
/// effect; it is never an error the controller propagates.
pub trait LocationProvider {
    fn current_coordinates(
        &self,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}
