//! Event and mention record models
//!
//! Semantic shapes of the documents the ingestion pipeline writes into the
//! store. Store adapters decode into these types; nothing downstream depends
//! on the storage encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One candidate geolocation of an event.
///
/// `precision` is the geocoding type code: `1` is country level, higher values
/// are finer (state, city, landmark). `point` is absent when the geocoder
/// produced no coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub precision: Option<i32>,
    pub full_name: Option<String>,
    pub point: Option<GeoPoint>,
}

impl Geolocation {
    pub fn new(precision: i32, point: GeoPoint) -> Self {
        Self {
            precision: Some(precision),
            full_name: None,
            point: Some(point),
        }
    }

    pub fn named(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }
}

/// One observed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub global_event_id: i64,
    pub event_date: DateTime<Utc>,
    /// CAMEO event classification code
    pub event_code: Option<String>,
    pub actor1_name: Option<String>,
    pub actor2_name: Option<String>,
    pub avg_tone: Option<f64>,
    pub num_mentions: Option<i32>,
    pub action_geo: Geolocation,
    pub actor1_geo: Geolocation,
    pub actor2_geo: Geolocation,
}

impl EventRecord {
    /// Event with no attributes beyond identity and time
    pub fn new(global_event_id: i64, event_date: DateTime<Utc>) -> Self {
        Self {
            global_event_id,
            event_date,
            event_code: None,
            actor1_name: None,
            actor2_name: None,
            avg_tone: None,
            num_mentions: None,
            action_geo: Geolocation::default(),
            actor1_geo: Geolocation::default(),
            actor2_geo: Geolocation::default(),
        }
    }
}

/// One article referencing an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionRecord {
    pub global_event_id: i64,
    pub mention_time: DateTime<Utc>,
    pub source_name: Option<String>,
    /// Article URL or other unique source identifier
    pub identifier: Option<String>,
    pub doc_tone: Option<f64>,
}
