//! Event detail payload
//!
//! Joins one event with its mentions. Blank text fields are replaced with
//! `N/A` so the client can render them verbatim.

use chrono::{DateTime, Utc};
use em_common::time::seconds_with_offset;
use em_common::{EventRecord, MentionRecord};
use serde::Serialize;
use tracing::debug;

/// Placeholder for missing display text
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsResponse {
    pub event_id: i64,
    pub title: String,
    #[serde(with = "seconds_with_offset")]
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub actors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_tone: Option<f64>,
    /// Total mentions recorded on the event, not the length of `mentions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions_count: Option<i32>,
    pub mentions: Vec<MentionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(with = "seconds_with_offset")]
    pub mention_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention_doc_tone: Option<f64>,
}

impl From<&MentionRecord> for MentionSummary {
    fn from(m: &MentionRecord) -> Self {
        Self {
            source: m.source_name.clone(),
            url: m.identifier.clone(),
            mention_time: m.mention_time,
            mention_doc_tone: m.doc_tone,
        }
    }
}

/// Assemble the detail response for `event` and its already-fetched mentions
pub fn build_details(event: &EventRecord, mentions: &[MentionRecord]) -> EventDetailsResponse {
    let mentions: Vec<MentionSummary> = mentions.iter().map(MentionSummary::from).collect();
    debug!(
        "Built details for event {} with {} mentions",
        event.global_event_id,
        mentions.len()
    );

    EventDetailsResponse {
        event_id: event.global_event_id,
        title: title(event),
        event_date: event.event_date,
        location: non_blank(event.action_geo.full_name.as_deref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        actors: actors(event),
        avg_tone: event.avg_tone,
        mentions_count: event.num_mentions,
        mentions,
    }
}

fn title(event: &EventRecord) -> String {
    match non_blank(event.event_code.as_deref()) {
        Some(code) => format!("CAMEO event {}", code),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn actors(event: &EventRecord) -> Vec<String> {
    let names: Vec<String> = [event.actor1_name.as_deref(), event.actor2_name.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        names
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
