//! Event endpoints
//!
//! - `GET /api/v1/events`: GeoJSON FeatureCollection for the map
//! - `GET /api/v1/events/:event_id`: one event with its mentions

use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Path, Query, State},
    Json,
};
use tracing::debug;

use super::error::{ApiError, ErrorResponse};
use crate::details::EventDetailsResponse;
use crate::geojson::FeatureCollection;
use crate::params::{parse_bounding_box, MapQuery};
use crate::AppState;

/// GET /api/v1/events?since=&until=&date=&bbox=&zoom=
///
/// Malformed parameters are rejected with 400. Once the request is accepted,
/// failures degrade to an empty collection.
pub async fn get_events_for_map(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<MapQuery>, QueryRejection>,
) -> Result<Json<FeatureCollection>, ErrorResponse> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()).at(&uri))?;

    if let Some(raw) = params.bbox.as_deref() {
        parse_bounding_box(raw).map_err(|e| ApiError::from(e).at(&uri))?;
    }

    let collection = state.service.events_for_map(&params).await;
    debug!("Returning {} features", collection.len());
    Ok(Json(collection))
}

/// GET /api/v1/events/:event_id
pub async fn get_event_details(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(raw_id): Path<String>,
) -> Result<Json<EventDetailsResponse>, ErrorResponse> {
    let event_id = parse_event_id(&raw_id).map_err(|e| e.at(&uri))?;

    let details = state
        .service
        .event_details(event_id)
        .await
        .map_err(|e| ApiError::from(e).at(&uri))?;

    Ok(Json(details))
}

fn parse_event_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        ApiError::BadRequest(format!(
            "eventId must be a 64-bit integer, got: '{}'",
            raw
        ))
    })
}
