//! Vector-backed store
//!
//! Same query semantics as the SQLite backend. Used by tests and fixture runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use em_common::{EventRecord, MentionRecord, Result};

use super::EventStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Vec<EventRecord>,
    mentions: Vec<MentionRecord>,
}

impl InMemoryEventStore {
    pub fn new(events: Vec<EventRecord>, mentions: Vec<MentionRecord>) -> Self {
        Self { events, mentions }
    }

    pub fn with_events(events: Vec<EventRecord>) -> Self {
        Self::new(events, Vec::new())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn find_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventRecord>> {
        let mut matching: Vec<&EventRecord> = self
            .events
            .iter()
            .filter(|e| e.event_date >= start && e.event_date < end)
            .collect();

        // Ties broken by id, as the SQLite backend orders them
        matching.sort_by(|a, b| {
            b.event_date
                .cmp(&a.event_date)
                .then(a.global_event_id.cmp(&b.global_event_id))
        });

        Ok(matching.into_iter().take(limit).cloned().collect())
    }

    async fn find_event(&self, global_event_id: i64) -> Result<Option<EventRecord>> {
        Ok(self
            .events
            .iter()
            .find(|e| e.global_event_id == global_event_id)
            .cloned())
    }

    async fn find_mentions(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionRecord>> {
        let mut matching: Vec<MentionRecord> = self
            .mentions
            .iter()
            .filter(|m| m.global_event_id == global_event_id)
            .filter(|m| m.mention_time >= start && m.mention_time <= end)
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.mention_time.cmp(&b.mention_time));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 20, h, 0, 0).unwrap()
    }

    fn mention(event_id: i64, h: u32) -> MentionRecord {
        MentionRecord {
            global_event_id: event_id,
            mention_time: at(h),
            source_name: Some("bbc.co.uk".into()),
            identifier: Some(format!("https://bbc.co.uk/{}", h)),
            doc_tone: Some(-1.5),
        }
    }

    #[tokio::test]
    async fn test_events_filtered_sorted_and_limited() {
        let store = InMemoryEventStore::with_events(vec![
            EventRecord::new(1, at(1)),
            EventRecord::new(2, at(5)),
            EventRecord::new(3, at(3)),
            EventRecord::new(4, at(10)),
        ]);

        let found = store.find_events_between(at(1), at(10), 10).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.global_event_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let limited = store.find_events_between(at(0), at(23), 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].global_event_id, 4);
    }

    #[tokio::test]
    async fn test_find_event_by_id() {
        let store = InMemoryEventStore::with_events(vec![EventRecord::new(7, at(1))]);
        assert!(store.find_event(7).await.unwrap().is_some());
        assert!(store.find_event(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mentions_inclusive_window() {
        let store = InMemoryEventStore::new(
            vec![EventRecord::new(1, at(1))],
            vec![mention(1, 4), mention(1, 1), mention(1, 9), mention(2, 2)],
        );

        let found = store.find_mentions(1, at(1), at(4)).await.unwrap();
        let hours: Vec<DateTime<Utc>> = found.iter().map(|m| m.mention_time).collect();
        assert_eq!(hours, vec![at(1), at(4)]);
    }
}
