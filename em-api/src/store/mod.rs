//! Document store access
//!
//! The service only reads. Events and mentions are written by the external
//! ingestion pipeline; every backend here is a read-only view over that data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use em_common::{EventRecord, MentionRecord, Result};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryEventStore;
pub use sqlite::{connect_readonly, SqliteEventStore};

/// Query capabilities the event pipeline needs from a store backend
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Events with `start <= event_date < end`, newest first, at most `limit`
    async fn find_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventRecord>>;

    /// Event by global identifier
    async fn find_event(&self, global_event_id: i64) -> Result<Option<EventRecord>>;

    /// Mentions of one event with `start <= mention_time <= end`, oldest first
    async fn find_mentions(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionRecord>>;
}
