use shared::AirLabsConfig;
use shared::airlabs::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS, Flight, FlightsResponse, flights_endpoint};
use std::future::Future;
use std::time::Duration;
use tracker::gateway::{FetchFailure, FlightGateway};
use tracker::viewport::Viewport;

/// reqwest-backed gateway against the AirLabs `/flights` endpoint.
///
/// The client-level timeout is the only cancellation mechanism for an
/// in-flight request; the orchestrator never aborts a superseded fetch, it
/// only discards its result.
pub struct AirLabsGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AirLabsGateway {
    pub fn new(config: &AirLabsConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_flights(&self, param: (&str, String)) -> Result<Vec<Flight>, FetchFailure> {
        let response = self
            .client
            .get(flights_endpoint(&self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(&[param])
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Server(status.as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        let parsed: FlightsResponse =
            serde_json::from_str(&body).map_err(|e| FetchFailure::BadData(e.to_string()))?;
        Ok(parsed.response)
    }
}

impl FlightGateway for AirLabsGateway {
    fn fetch_by_region(
        &self,
        viewport: &Viewport,
    ) -> impl Future<Output = Result<Vec<Flight>, FetchFailure>> + Send {
        let bbox = viewport.bbox_param();
        async move { self.get_flights(("bbox", bbox)).await }
    }

    fn fetch_by_query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Flight>, FetchFailure>> + Send {
        let query = query.to_string();
        async move { self.get_flights(("flight_iata", query)).await }
    }
}

fn classify(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if let Some(status) = error.status() {
        FetchFailure::Server(status.as_u16())
    } else {
        FetchFailure::Connection(error.to_string())
    }
}
