//! Best-coordinate selection
//!
//! An event carries up to three candidate geolocations. The map renders one
//! point per event, chosen by precision:
//! 1. action location, if finer than country level
//! 2. actor 1 location, if finer than country level
//! 3. actor 2 location, if finer than country level
//! 4. action location at any precision
//! 5. nothing

use em_common::{EventRecord, GeoPoint, Geolocation};
use tracing::debug;

/// Precision code for country-level geocoding (coarsest)
pub const COUNTRY_LEVEL_PRECISION: i32 = 1;

/// Pick the point to render for `event`, or `None` when it has no geodata
pub fn select_best_coordinate(event: &EventRecord) -> Option<GeoPoint> {
    let candidates = [
        ("action", &event.action_geo),
        ("actor1", &event.actor1_geo),
        ("actor2", &event.actor2_geo),
    ];

    for (label, geo) in candidates {
        if let Some(point) = precise_point(geo) {
            debug!(
                event_id = event.global_event_id,
                precision = ?geo.precision,
                "Using {} location",
                label
            );
            return Some(point);
        }
    }

    if let Some(point) = event.action_geo.point {
        debug!(
            event_id = event.global_event_id,
            precision = ?event.action_geo.precision,
            "Using coarse action location as fallback"
        );
        return Some(point);
    }

    debug!(event_id = event.global_event_id, "No coordinates available");
    None
}

fn precise_point(geo: &Geolocation) -> Option<GeoPoint> {
    geo.point.filter(|_| is_precise_enough(geo.precision))
}

/// True when the precision code is finer than country level
pub fn is_precise_enough(precision: Option<i32>) -> bool {
    precision.is_some_and(|p| p > COUNTRY_LEVEL_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event() -> EventRecord {
        EventRecord::new(1, Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap())
    }

    fn geo(precision: i32, lat: f64, lon: f64) -> Geolocation {
        Geolocation::new(precision, GeoPoint::new(lat, lon))
    }

    #[test]
    fn test_precise_action_wins() {
        let mut e = event();
        e.action_geo = geo(4, 48.85, 2.35);
        e.actor1_geo = geo(3, 40.0, -74.0);
        e.actor2_geo = geo(5, 10.0, 10.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(48.85, 2.35)));
    }

    #[test]
    fn test_coarse_action_defers_to_precise_actor1() {
        let mut e = event();
        e.action_geo = geo(1, 46.0, 2.0);
        e.actor1_geo = geo(3, 40.7, -74.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(40.7, -74.0)));
    }

    #[test]
    fn test_actor1_only() {
        let mut e = event();
        e.actor1_geo = geo(2, 51.5, -0.12);
        e.actor2_geo = geo(1, 55.0, 37.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(51.5, -0.12)));
    }

    #[test]
    fn test_precise_actor2_when_others_coarse() {
        let mut e = event();
        e.action_geo = geo(1, 46.0, 2.0);
        e.actor1_geo = geo(1, 39.0, -98.0);
        e.actor2_geo = geo(4, 55.75, 37.61);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(55.75, 37.61)));
    }

    #[test]
    fn test_coarse_action_fallback() {
        let mut e = event();
        e.action_geo = geo(1, 46.0, 2.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(46.0, 2.0)));
    }

    #[test]
    fn test_coarse_action_preferred_over_coarse_actors() {
        let mut e = event();
        e.action_geo = geo(1, 46.0, 2.0);
        e.actor1_geo = geo(1, 39.0, -98.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(46.0, 2.0)));
    }

    #[test]
    fn test_missing_precision_is_not_precise() {
        let mut e = event();
        e.actor1_geo = Geolocation {
            precision: None,
            full_name: None,
            point: Some(GeoPoint::new(1.0, 1.0)),
        };

        assert_eq!(select_best_coordinate(&e), None);
    }

    #[test]
    fn test_precision_without_point_is_skipped() {
        let mut e = event();
        e.action_geo = Geolocation {
            precision: Some(4),
            full_name: Some("Paris, France".into()),
            point: None,
        };
        e.actor2_geo = geo(3, 1.0, 2.0);

        assert_eq!(select_best_coordinate(&e), Some(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_no_geodata() {
        assert_eq!(select_best_coordinate(&event()), None);
    }
}
