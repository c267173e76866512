use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::airlabs::Flight;
use std::sync::Arc;

/// The single source of truth for the currently displayed flights.
///
/// Fetch-driven only: the orchestrator's commit step replaces the whole set
/// atomically, and readers only ever observe a complete snapshot. There is
/// no incremental splice and no field-level mutation of a committed flight.
#[derive(Debug, Clone, Default)]
pub struct FlightStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    flights: Arc<Vec<Flight>>,
    last_updated: Option<DateTime<Utc>>,
}

impl FlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale swap. Readers holding an earlier snapshot keep it alive
    /// through the `Arc`; they never see a half-replaced collection.
    pub fn replace_all(&self, flights: Vec<Flight>) {
        let mut inner = self.inner.write();
        inner.flights = Arc::new(flights);
        inner.last_updated = Some(Utc::now());
    }

    /// Read-only snapshot for rendering.
    pub fn current(&self) -> Arc<Vec<Flight>> {
        Arc::clone(&self.inner.read().flights)
    }

    /// When the last successful commit happened, for health reporting.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.read().last_updated
    }

    pub fn len(&self) -> usize {
        self.inner.read().flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(hex: &str) -> Flight {
        serde_json::from_value(serde_json::json!({ "hex": hex, "updated": 1_700_000_000 }))
            .expect("minimal flight should deserialize")
    }

    #[test]
    fn replace_all_swaps_the_whole_set() {
        let store = FlightStore::new();
        assert!(store.is_empty());
        assert_eq!(store.last_updated(), None);

        store.replace_all(vec![flight("A"), flight("B")]);
        let first = store.current();
        assert_eq!(first.len(), 2);
        assert!(store.last_updated().is_some());

        store.replace_all(vec![flight("C")]);
        assert_eq!(store.len(), 1);
        // The earlier snapshot is untouched by the swap.
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].hex, "A");
    }

    #[test]
    fn duplicate_hex_entries_are_passed_through() {
        let store = FlightStore::new();
        store.replace_all(vec![flight("A"), flight("A")]);
        assert_eq!(store.len(), 2);
    }
}
