pub mod debounce;
pub mod gateway;
pub mod orchestrator;
pub mod store;
pub mod viewport;

pub use debounce::Debouncer;
pub use gateway::{FetchFailure, FetchRequest, FlightGateway, LocationError, LocationProvider};
pub use orchestrator::FetchOrchestrator;
pub use store::FlightStore;
pub use viewport::{Coordinates, Viewport};
