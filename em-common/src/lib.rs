//! # EventMosaic Common Library
//!
//! Shared code for the EventMosaic services including:
//! - Event and mention record models
//! - Configuration loading
//! - Error types
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use config::ApiConfig;
pub use error::{Error, Result};
pub use models::{EventRecord, GeoPoint, Geolocation, MentionRecord};
