use serde::{Deserialize, Serialize};

/// A device location fix as reported by a location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The visible map region: center plus half-spans. Deltas are non-negative,
/// so the bounding box is `[lat - dlat, lat + dlat] x [lng - dlng, lng + dlng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Viewport {
    /// Same spans, new center.
    #[must_use]
    pub fn recentered(self, coords: Coordinates) -> Self {
        Self {
            latitude: coords.latitude,
            longitude: coords.longitude,
            ..self
        }
    }

    /// Bounding box in the wire encoding the flights API expects:
    /// min-lat, min-lng, max-lat, max-lng, each rounded to 4 decimal places.
    pub fn bbox_param(&self) -> String {
        format!(
            "{:.4}, {:.4}, {:.4}, {:.4}",
            self.latitude - self.latitude_delta,
            self.longitude - self.longitude_delta,
            self.latitude + self.latitude_delta,
            self.longitude + self.longitude_delta
        )
    }
}

impl Default for Viewport {
    /// Placeholder region used until a real location is acquired.
    fn default() -> Self {
        Self {
            latitude: 7.78825,
            longitude: -222.4324,
            latitude_delta: 10.0,
            longitude_delta: 10.0,
        }
    }
}
