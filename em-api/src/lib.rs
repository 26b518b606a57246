//! em-api library - read-only geospatial event API
//!
//! Serves GDELT-style events as GeoJSON for a map client, plus a detail view
//! joining one event with its news mentions.

use axum::Router;
use em_common::ApiConfig;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod details;
pub mod geojson;
pub mod geolocation;
pub mod params;
pub mod query;
pub mod service;
pub mod store;

use service::EventService;
use store::EventStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: EventService,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, config: &ApiConfig) -> Self {
        Self {
            service: EventService::new(store, config.api.clone()),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let events = Router::new()
        .route("/api/v1/events", get(api::get_events_for_map))
        .route("/api/v1/events/:event_id", get(api::get_event_details));

    Router::new()
        .merge(events)
        .merge(api::health_routes())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
