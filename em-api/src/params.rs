//! Request parameter normalization
//!
//! - Bounding box: `"minLat,minLon,maxLat,maxLon"` parsed into checked bounds
//! - Time window: optional since/until days turned into a concrete `[start, end)`

use chrono::{DateTime, Duration, NaiveDate, Utc};
use em_common::{time, Error};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

const BBOX_COMPONENTS: usize = 4;
const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Map query parameters as received on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQuery {
    /// First day of the window (inclusive)
    pub since: Option<NaiveDate>,
    /// Last day of the window (inclusive)
    pub until: Option<NaiveDate>,
    /// Single day; ignored when since or until is given
    pub date: Option<NaiveDate>,
    /// `"minLat,minLon,maxLat,maxLon"`
    pub bbox: Option<String>,
    /// Map zoom level (accepted, not used for selection)
    pub zoom: Option<u32>,
}

impl MapQuery {
    /// Derive the query window relative to the current time
    pub fn time_window(&self, default_window_hours: u32) -> em_common::Result<TimeWindow> {
        self.time_window_at(default_window_hours, time::now())
    }

    /// Fails with `InvalidParameter` when a bound falls outside the
    /// representable timestamp range
    pub fn time_window_at(
        &self,
        default_window_hours: u32,
        now: DateTime<Utc>,
    ) -> em_common::Result<TimeWindow> {
        if self.since.is_none() && self.until.is_none() {
            if let Some(day) = self.date {
                debug!("Using single-day window for {}", day);
                let end = next_day("date", day)?;
                return Ok(TimeWindow::new(time::start_of_day_utc(day), end));
            }
        }

        let until = self.until.map(|day| next_day("until", day)).transpose()?;

        TimeWindow::derive_at(
            self.since.map(time::start_of_day_utc),
            until,
            default_window_hours,
            now,
        )
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "time window of {} hours around since={:?}, until={:?} is out of range",
                default_window_hours, self.since, self.until
            ))
        })
    }
}

fn next_day(name: &str, day: NaiveDate) -> em_common::Result<DateTime<Utc>> {
    time::start_of_next_day_utc(day)
        .ok_or_else(|| Error::InvalidParameter(format!("{} is out of range: {}", name, day)))
}

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window from already-normalized instants, anchored to the current time
    /// when neither bound is given
    pub fn derive(
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        default_window_hours: u32,
    ) -> Option<Self> {
        Self::derive_at(since, until, default_window_hours, time::now())
    }

    /// Same as [`TimeWindow::derive`] with an explicit "now".
    ///
    /// Both bounds are used as given; `since <= until` is the caller's concern.
    /// `None` when the derived bound overflows the timestamp range.
    pub fn derive_at(
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        default_window_hours: u32,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let window = Duration::hours(i64::from(default_window_hours));

        let (start, end) = match (since, until) {
            (Some(since), Some(until)) => (since, until),
            (Some(since), None) => (since, since.checked_add_signed(window)?),
            (None, Some(until)) => (until.checked_sub_signed(window)?, until),
            (None, None) => (now.checked_sub_signed(window)?, now),
        };

        debug!("Time window: {} - {}", start, end);
        Some(Self { start, end })
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Validated map viewport.
///
/// Invariant: `min_lat < max_lat`, `min_lon < max_lon`, all within WGS84 ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl BoundingBox {
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Inclusive on all edges
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minLat={}, minLon={}, maxLat={}, maxLon={}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Reasons a bounding-box string is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    #[error("bbox must have 4 comma-separated components (minLat,minLon,maxLat,maxLon), got {0}")]
    ComponentCount(usize),

    #[error("bbox component '{0}' is not a valid number")]
    NotANumber(String),

    #[error("{name} must be in range [{min:.1}, {max:.1}], got: {value:.2}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("minLat must be less than maxLat")]
    LatitudeOrder,

    #[error("minLon must be less than maxLon")]
    LongitudeOrder,
}

/// Parse `"minLat,minLon,maxLat,maxLon"`.
///
/// Blank input means "no spatial filter" and yields `Ok(None)`.
pub fn parse_bounding_box(input: &str) -> Result<Option<BoundingBox>, BoundingBoxError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let components: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if components.len() != BBOX_COMPONENTS {
        return Err(BoundingBoxError::ComponentCount(components.len()));
    }

    let mut values = [0.0f64; BBOX_COMPONENTS];
    for (slot, raw) in values.iter_mut().zip(&components) {
        *slot = parse_component(raw)?;
    }
    let [min_lat, min_lon, max_lat, max_lon] = values;

    check_bound("minLat", min_lat, MIN_LATITUDE, MAX_LATITUDE)?;
    check_bound("maxLat", max_lat, MIN_LATITUDE, MAX_LATITUDE)?;
    check_bound("minLon", min_lon, MIN_LONGITUDE, MAX_LONGITUDE)?;
    check_bound("maxLon", max_lon, MIN_LONGITUDE, MAX_LONGITUDE)?;

    if min_lat >= max_lat {
        return Err(BoundingBoxError::LatitudeOrder);
    }
    if min_lon >= max_lon {
        return Err(BoundingBoxError::LongitudeOrder);
    }

    Ok(Some(BoundingBox {
        min_lat,
        min_lon,
        max_lat,
        max_lon,
    }))
}

fn parse_component(raw: &str) -> Result<f64, BoundingBoxError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BoundingBoxError::NotANumber(raw.to_string()))
}

fn check_bound(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), BoundingBoxError> {
    if value < min || value > max {
        return Err(BoundingBoxError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
