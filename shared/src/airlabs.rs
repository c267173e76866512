use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://airlabs.co/api/v9";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub fn flights_endpoint(base_url: &str) -> String {
    format!("{}/flights", base_url.trim_end_matches('/'))
}

/// Envelope of the `/flights` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FlightsResponse {
    #[serde(default)]
    pub response: Vec<Flight>,
}

/// One active flight as reported by AirLabs. An immutable value snapshot:
/// freshness is guaranteed at the collection level, so a new fetch always
/// produces a whole new set of these rather than patching fields in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flight {
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub reg_number: String,
    #[serde(default)]
    pub flag: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alt: Option<f64>,
    pub dir: Option<f64>,
    pub speed: Option<f64>,
    pub v_speed: Option<f64>,
    #[serde(default)]
    pub squawk: String,
    pub airline_icao: Option<String>,
    pub airline_iata: Option<String>,
    pub flight_icao: Option<String>,
    pub flight_iata: Option<String>,
    #[serde(default)]
    pub flight_number: String,
    pub dep_icao: Option<String>,
    pub dep_iata: Option<String>,
    pub arr_icao: Option<String>,
    pub arr_iata: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_flight_with_sparse_fields() {
        let raw = serde_json::json!({
            "hex": "A09E20",
            "flag": "US",
            "lat": 36.5868,
            "lng": -121.8455,
            "alt": 11582.0,
            "dir": 132.0,
            "speed": 844.0,
            "flight_iata": "AA456",
            "dep_iata": "SFO",
            "arr_iata": "DFW",
            "updated": 1_700_000_000,
            "status": "en-route"
        });

        let flight: Flight = serde_json::from_value(raw).expect("flight should deserialize");
        assert_eq!(flight.hex, "A09E20");
        assert_eq!(flight.flight_iata.as_deref(), Some("AA456"));
        assert_eq!(flight.v_speed, None);
        assert_eq!(flight.reg_number, "");
        assert_eq!(flight.updated.timestamp(), 1_700_000_000);
    }

    #[test]
    fn response_envelope_defaults_to_empty() {
        let parsed: FlightsResponse = serde_json::from_str("{}").expect("envelope");
        assert!(parsed.response.is_empty());
    }

    #[test]
    fn flights_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            flights_endpoint("https://airlabs.co/api/v9/"),
            "https://airlabs.co/api/v9/flights"
        );
    }
}
