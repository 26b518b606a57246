//! GeoJSON output types and event conversion
//!
//! Each event that resolves to a point becomes one `Point` feature with
//! `coordinates = [lon, lat]`. Events that cannot be placed are skipped; the
//! collection never contains placeholders.

use em_common::{EventRecord, GeoPoint};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::geolocation::select_best_coordinate;

/// `{"type": "FeatureCollection", "features": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// `{"type": "Feature", "geometry": {...}, "properties": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[lon, lat]`, GeoJSON axis order
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinates are not finite numbers: lat={lat}, lon={lon}")]
    NotFinite { lat: f64, lon: f64 },

    #[error("coordinates outside WGS84 range: lat={lat}, lon={lon}")]
    OutOfRange { lat: f64, lon: f64 },
}

impl Geometry {
    /// Point geometry from a resolved coordinate
    pub fn point(point: GeoPoint) -> Result<Self, GeometryError> {
        let GeoPoint { lat, lon } = point;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeometryError::NotFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeometryError::OutOfRange { lat, lon });
        }
        Ok(Geometry::Point {
            coordinates: [lon, lat],
        })
    }
}

/// Feature properties; `clusterCount` is the number of events behind the point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_tone: Option<f64>,
    pub cluster_count: u32,
}

impl FeatureProperties {
    pub fn single_event(event_id: i64, avg_tone: Option<f64>) -> Self {
        Self {
            event_id: Some(event_id),
            avg_tone,
            cluster_count: 1,
        }
    }
}

/// Feature for one event, or `None` when it has no usable point
pub fn convert_to_feature(event: &EventRecord) -> Option<Feature> {
    let Some(point) = select_best_coordinate(event) else {
        debug!("Event {} skipped - no coordinates", event.global_event_id);
        return None;
    };

    match Geometry::point(point) {
        Ok(geometry) => Some(Feature {
            geometry,
            properties: FeatureProperties::single_event(event.global_event_id, event.avg_tone),
        }),
        Err(e) => {
            warn!("Event {} skipped - {}", event.global_event_id, e);
            None
        }
    }
}

/// Convert events in order, dropping the ones that cannot be placed
pub fn convert_to_feature_collection(events: &[EventRecord]) -> FeatureCollection {
    let features: Vec<Feature> = events.iter().filter_map(convert_to_feature).collect();

    debug!(
        "Converted {} of {} events to GeoJSON features",
        features.len(),
        events.len()
    );
    FeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use em_common::Geolocation;
    use serde_json::json;

    fn placed(id: i64, lat: f64, lon: f64, tone: Option<f64>) -> EventRecord {
        let mut e = EventRecord::new(id, Utc.with_ymd_and_hms(2025, 6, 20, 8, 0, 0).unwrap());
        e.action_geo = Geolocation::new(4, GeoPoint::new(lat, lon));
        e.avg_tone = tone;
        e
    }

    #[test]
    fn test_feature_is_lon_first() {
        let feature = convert_to_feature(&placed(42, 48.85, 2.35, Some(-3.2))).unwrap();
        assert_eq!(
            feature.geometry,
            Geometry::Point {
                coordinates: [2.35, 48.85]
            }
        );
        assert_eq!(feature.properties.event_id, Some(42));
        assert_eq!(feature.properties.avg_tone, Some(-3.2));
        assert_eq!(feature.properties.cluster_count, 1);
    }

    #[test]
    fn test_feature_json_shape() {
        let feature = convert_to_feature(&placed(42, 5.0, 6.0, Some(1.5))).unwrap();
        let value = serde_json::to_value(FeatureCollection::new(vec![feature])).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [6.0, 5.0] },
                    "properties": { "eventId": 42, "avgTone": 1.5, "clusterCount": 1 }
                }]
            })
        );
    }

    #[test]
    fn test_missing_tone_is_omitted() {
        let feature = convert_to_feature(&placed(1, 0.0, 0.0, None)).unwrap();
        let value = serde_json::to_value(&feature.properties).unwrap();
        assert_eq!(value, json!({ "eventId": 1, "clusterCount": 1 }));
    }

    #[test]
    fn test_event_without_coordinates_yields_no_feature() {
        let e = EventRecord::new(9, Utc::now());
        assert!(convert_to_feature(&e).is_none());
    }

    #[test]
    fn test_invalid_point_yields_no_feature() {
        assert!(convert_to_feature(&placed(1, f64::NAN, 0.0, None)).is_none());
        assert!(convert_to_feature(&placed(2, 95.0, 0.0, None)).is_none());
    }

    #[test]
    fn test_collection_keeps_order_and_drops_unplaceable() {
        let events = vec![
            placed(1, 1.0, 1.0, None),
            EventRecord::new(2, Utc::now()),
            placed(3, 3.0, 3.0, None),
            placed(4, f64::INFINITY, 3.0, None),
            placed(5, 5.0, 5.0, None),
        ];

        let collection = convert_to_feature_collection(&events);
        let ids: Vec<Option<i64>> = collection
            .features
            .iter()
            .map(|f| f.properties.event_id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(3), Some(5)]);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let e = placed(11, 12.5, -7.25, Some(0.75));
        let first = serde_json::to_vec(&convert_to_feature(&e)).unwrap();
        let second = serde_json::to_vec(&convert_to_feature(&e)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_collection_serializes_with_empty_array() {
        let value = serde_json::to_value(FeatureCollection::empty()).unwrap();
        assert_eq!(value, json!({ "type": "FeatureCollection", "features": [] }));
    }
}
