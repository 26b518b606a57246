//! Event query pipeline
//!
//! time window → fetch (with headroom) → optional bbox filter → cap.
//!
//! The bbox filter fails open: if the bbox cannot be parsed at this stage the
//! unfiltered list is returned and the problem is logged.

use em_common::config::ApiSettings;
use em_common::{EventRecord, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::geolocation::select_best_coordinate;
use crate::params::{parse_bounding_box, BoundingBox, MapQuery};
use crate::store::EventStore;

/// Runs map queries against one store with fixed limits
#[derive(Clone)]
pub struct EventQuery {
    store: Arc<dyn EventStore>,
    settings: ApiSettings,
}

impl EventQuery {
    pub fn new(store: Arc<dyn EventStore>, settings: ApiSettings) -> Self {
        Self { store, settings }
    }

    /// Events for the map, in store order, at most `max_individual_events_per_request`
    pub async fn find_events(&self, params: &MapQuery) -> Result<Vec<EventRecord>> {
        debug!("Finding events for {:?}", params);
        if let Some(zoom) = params.zoom {
            debug!("Zoom {} requested; individual events only", zoom);
        }

        let max_results = self.max_results();
        let window = params.time_window(self.settings.default_event_window_hours)?;

        let events = self
            .store
            .find_events_between(window.start, window.end, fetch_size(max_results))
            .await?;
        debug!("Found {} events in time window", events.len());

        let filtered = apply_geographical_filter(events, params.bbox.as_deref());
        debug!("{} events remain after geographic filter", filtered.len());

        Ok(limit_results(filtered, max_results))
    }

    fn max_results(&self) -> usize {
        self.settings.max_individual_events_per_request as usize
    }
}

/// Rows fetched per query: twice the cap, leaving room for events the
/// bbox filter or coordinate resolution will drop
pub fn fetch_size(max_results: usize) -> usize {
    max_results.saturating_mul(2)
}

/// Apply the bbox filter if one was given; never fails
pub fn apply_geographical_filter(events: Vec<EventRecord>, bbox: Option<&str>) -> Vec<EventRecord> {
    let raw = match bbox {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            debug!("No bbox given, geographic filter skipped");
            return events;
        }
    };

    match parse_bounding_box(raw) {
        Ok(Some(bbox)) => filter_by_bounding_box(events, &bbox),
        Ok(None) => events,
        Err(e) => {
            warn!("Invalid bbox '{}': {}. Skipping geographic filter", raw, e);
            events
        }
    }
}

/// Keep events whose best coordinate lies inside `bbox` (edges inclusive).
/// Events without a coordinate are dropped.
pub fn filter_by_bounding_box(events: Vec<EventRecord>, bbox: &BoundingBox) -> Vec<EventRecord> {
    debug!("Applying geographic filter: {}", bbox);

    events
        .into_iter()
        .filter(|event| {
            select_best_coordinate(event).is_some_and(|point| bbox.contains(point.lat, point.lon))
        })
        .collect()
}

/// Truncate to `max_results`, keeping order
pub fn limit_results(mut events: Vec<EventRecord>, max_results: usize) -> Vec<EventRecord> {
    if events.len() <= max_results {
        return events;
    }

    info!("Result limited to {} of {} events", max_results, events.len());
    events.truncate(max_results);
    events
}
