use crate::debounce::Debouncer;
use crate::gateway::{FetchFailure, FetchRequest, FlightGateway};
use crate::store::FlightStore;
use crate::viewport::{Coordinates, Viewport};
use parking_lot::RwLock;
use shared::airlabs::Flight;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Minimum time the refresh indicators stay raised once a user-visible
/// fetch starts, so the feedback is perceptible even on a fast network.
pub const MIN_INDICATOR_VISIBILITY: Duration = Duration::from_millis(750);

/// Quiet period for collapsing a pan/zoom gesture's stream of
/// region-change events into a single fetch.
pub const REGION_CHANGE_QUIET_PERIOD: Duration = Duration::from_secs(5);

/// The fetch-orchestration controller.
///
/// Owns the viewport, the search query, the indicator flags and the flight
/// store, and is the only writer to any of them. Three triggers feed it:
/// location acquisition, debounced map region changes, and free-text
/// flight-number search; a non-empty search suppresses region-driven
/// fetches until cleared.
///
/// Overlapping fetches are allowed. Every issuance is tagged with a
/// monotonically increasing request id and a result is committed only if
/// its id is still the most recently issued one, so a slow fetch from an
/// abandoned pan position can never overwrite a newer result. In-flight
/// requests are not aborted when superseded; the gateway's own network
/// timeout is the sole cancellation mechanism.
pub struct FetchOrchestrator<G> {
    gateway: G,
    viewport: RwLock<Viewport>,
    query: RwLock<String>,
    store: FlightStore,
    is_loading: RwLock<bool>,
    refreshing: RwLock<bool>,
    last_issued: AtomicU64,
    last_failure: RwLock<Option<FetchFailure>>,
}

impl<G: FlightGateway> FetchOrchestrator<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            viewport: RwLock::new(Viewport::default()),
            query: RwLock::new(String::new()),
            store: FlightStore::new(),
            is_loading: RwLock::new(false),
            refreshing: RwLock::new(false),
            last_issued: AtomicU64::new(0),
            last_failure: RwLock::new(None),
        }
    }

    /// The debounced entry point for map region-change events. Built once;
    /// the current viewport travels as the call argument, never via a
    /// captured reference that could go stale.
    pub fn region_debouncer(self: &Arc<Self>) -> Debouncer<Viewport> {
        let orchestrator = Arc::clone(self);
        Debouncer::new(REGION_CHANGE_QUIET_PERIOD, move |viewport| {
            let orchestrator = Arc::clone(&orchestrator);
            async move { orchestrator.on_region_changed(viewport).await }
        })
    }

    /// Startup trigger. A denied or failed location acquisition leaves the
    /// placeholder viewport in effect and still fetches against it.
    pub async fn on_location_acquired(&self, coords: Option<Coordinates>) {
        match coords {
            Some(coords) => {
                let mut viewport = self.viewport.write();
                *viewport = viewport.recentered(coords);
            }
            None => info!("no device location, fetching against the placeholder viewport"),
        }

        *self.is_loading.write() = true;
        let viewport = *self.viewport.read();
        self.run_fetch(FetchRequest::Region(viewport)).await;
        *self.is_loading.write() = false;
    }

    /// User-initiated refresh: clears any active search and refetches the
    /// current viewport.
    pub async fn on_manual_refresh(&self) {
        self.query.write().clear();
        *self.refreshing.write() = true;
        let viewport = *self.viewport.read();
        self.fetch_with_floor(FetchRequest::Region(viewport)).await;
        *self.refreshing.write() = false;
    }

    /// Free-text search trigger. An empty string clears the search and
    /// falls back to a region fetch against the current viewport.
    pub async fn on_query_changed(&self, text: impl Into<String>) {
        let text = text.into();
        *self.query.write() = text.clone();
        *self.refreshing.write() = true;
        let request = if text.is_empty() {
            FetchRequest::Region(*self.viewport.read())
        } else {
            FetchRequest::Query(text)
        };
        self.fetch_with_floor(request).await;
        *self.refreshing.write() = false;
    }

    /// Map pan/zoom trigger; always reached through [`Self::region_debouncer`].
    /// A no-op while a search is active: search takes precedence over
    /// panning, and the viewport is not even updated.
    pub async fn on_region_changed(&self, viewport: Viewport) {
        if !self.query.read().is_empty() {
            debug!("search is active, ignoring region change");
            return;
        }

        *self.viewport.write() = viewport;
        *self.is_loading.write() = true;
        self.fetch_with_floor(FetchRequest::Region(viewport)).await;
        *self.is_loading.write() = false;
    }

    /// Re-issues the fetch for whichever input is active, without touching
    /// the indicator flags. Used by the periodic background refresh, not by
    /// the presentation layer.
    pub async fn refresh_current(&self) {
        let request = {
            let query = self.query.read();
            if query.is_empty() {
                FetchRequest::Region(*self.viewport.read())
            } else {
                FetchRequest::Query(query.clone())
            }
        };
        self.run_fetch(request).await;
    }

    /// Races the fetch against the minimum-visibility timer and awaits the
    /// longer of the two; the fetch itself is never delayed.
    async fn fetch_with_floor(&self, request: FetchRequest) {
        tokio::join!(self.run_fetch(request), sleep(MIN_INDICATOR_VISIBILITY));
    }

    async fn run_fetch(&self, request: FetchRequest) {
        let id = self.last_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = match &request {
            FetchRequest::Region(viewport) => self.gateway.fetch_by_region(viewport).await,
            FetchRequest::Query(text) => self.gateway.fetch_by_query(text).await,
        };

        match result {
            Ok(flights) => self.commit(id, flights),
            Err(failure) => {
                // Stale data beats no data: the store keeps its previous set.
                warn!(error = %failure, request = ?request, "flight fetch failed, keeping previous flights");
                // A superseded fetch has lost ownership of the failure
                // record too; a newer success must not be re-poisoned.
                if self.last_issued.load(Ordering::SeqCst) == id {
                    *self.last_failure.write() = Some(failure);
                }
            }
        }
    }

    fn commit(&self, id: u64, flights: Vec<Flight>) {
        if self.last_issued.load(Ordering::SeqCst) != id {
            debug!(request_id = id, "discarding result of superseded fetch");
            return;
        }
        debug!(request_id = id, count = flights.len(), "committing fetched flights");
        self.store.replace_all(flights);
        *self.last_failure.write() = None;
    }

    // Read surface for the presentation layer.

    pub fn flights(&self) -> Arc<Vec<Flight>> {
        self.store.current()
    }

    pub fn store(&self) -> FlightStore {
        self.store.clone()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.read()
    }

    pub fn query(&self) -> String {
        self.query.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.is_loading.read()
    }

    pub fn refreshing(&self) -> bool {
        *self.refreshing.read()
    }

    pub fn last_failure(&self) -> Option<FetchFailure> {
        self.last_failure.read().clone()
    }
}
