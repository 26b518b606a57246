//! HTTP API handlers for em-api

pub mod error;
pub mod events;
pub mod health;

pub use error::{ApiError, ErrorResponse};
pub use events::{get_event_details, get_events_for_map};
pub use health::health_routes;
