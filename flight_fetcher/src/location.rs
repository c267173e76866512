use shared::LocationConfig;
use std::future::Future;
use tracker::gateway::{LocationError, LocationProvider};
use tracker::viewport::Coordinates;

/// Location provider backed by the `[location]` section of the settings
/// file. A headless service has no GPS to ask; an absent section behaves
/// exactly like a denied permission.
pub struct ConfigLocationProvider {
    location: Option<LocationConfig>,
}

impl ConfigLocationProvider {
    pub fn new(location: Option<LocationConfig>) -> Self {
        Self { location }
    }
}

impl LocationProvider for ConfigLocationProvider {
    fn current_coordinates(
        &self,
    ) -> impl Future<Output = Result<Coordinates, LocationError>> + Send {
        let result = self
            .location
            .map(|l| Coordinates {
                latitude: l.latitude,
                longitude: l.longitude,
            })
            .ok_or(LocationError::Denied);
        async move { result }
    }
}
