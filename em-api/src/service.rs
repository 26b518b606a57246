//! Event service: the two read paths behind the HTTP API
//!
//! - Map: query pipeline + GeoJSON conversion. Internal failures degrade to an
//!   empty FeatureCollection.
//! - Details: one event plus its mentions. Not-found and store failures are
//!   reported to the caller.

use chrono::{DateTime, Duration, Utc};
use em_common::config::ApiSettings;
use em_common::{Error, EventRecord, MentionRecord, Result};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::details::{build_details, EventDetailsResponse};
use crate::geojson::{convert_to_feature_collection, FeatureCollection};
use crate::params::MapQuery;
use crate::query::EventQuery;
use crate::store::EventStore;

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    query: EventQuery,
    settings: ApiSettings,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, settings: ApiSettings) -> Self {
        Self {
            query: EventQuery::new(store.clone(), settings.clone()),
            store,
            settings,
        }
    }

    /// Events for the map as GeoJSON. Never fails.
    pub async fn events_for_map(&self, params: &MapQuery) -> FeatureCollection {
        match self.query.find_events(params).await {
            Ok(events) => convert_to_feature_collection(&events),
            Err(e) => {
                error!("Failed to load events for map: {}", e);
                FeatureCollection::empty()
            }
        }
    }

    /// Event details with mentions from the event date through the mention search range
    pub async fn event_details(&self, event_id: i64) -> Result<EventDetailsResponse> {
        debug!("Event details requested: eventId={}", event_id);

        let event = self.find_event(event_id).await?;
        let mentions = self.find_mentions_for(&event).await?;
        debug!("Found {} mentions for event {}", mentions.len(), event_id);

        Ok(build_details(&event, &mentions))
    }

    async fn find_event(&self, event_id: i64) -> Result<EventRecord> {
        self.store.find_event(event_id).await?.ok_or_else(|| {
            warn!("Event not found: eventId={}", event_id);
            Error::NotFound(format!("Event with ID {} not found", event_id))
        })
    }

    async fn find_mentions_for(&self, event: &EventRecord) -> Result<Vec<MentionRecord>> {
        let start = event.event_date;
        let end = start
            .checked_add_signed(Duration::days(i64::from(self.settings.mention_search_days_range)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.store
            .find_mentions(event.global_event_id, start, end)
            .await
    }
}
