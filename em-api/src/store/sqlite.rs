//! SQLite store backend
//!
//! All connections are read-only. Rows are decoded field by field into the
//! record models; timestamps are stored as epoch milliseconds and each
//! geolocation as a (type, full name, lat, long) column group.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use em_common::time::{from_epoch_millis, to_epoch_millis};
use em_common::{Error, EventRecord, GeoPoint, Geolocation, MentionRecord, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::debug;

use super::EventStore;

/// Table definitions shared with fixture builders and ingestion tooling
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS events (
        global_event_id INTEGER PRIMARY KEY,
        event_date INTEGER NOT NULL,
        event_code TEXT,
        actor1_name TEXT,
        actor2_name TEXT,
        avg_tone REAL,
        num_mentions INTEGER,
        action_geo_type INTEGER,
        action_geo_full_name TEXT,
        action_geo_lat REAL,
        action_geo_long REAL,
        actor1_geo_type INTEGER,
        actor1_geo_full_name TEXT,
        actor1_geo_lat REAL,
        actor1_geo_long REAL,
        actor2_geo_type INTEGER,
        actor2_geo_full_name TEXT,
        actor2_geo_lat REAL,
        actor2_geo_long REAL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_events_event_date ON events(event_date)",
    r#"
    CREATE TABLE IF NOT EXISTS mentions (
        global_event_id INTEGER NOT NULL,
        mention_time INTEGER NOT NULL,
        mention_source_name TEXT,
        mention_identifier TEXT,
        mention_doc_tone REAL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_mentions_event_time ON mentions(global_event_id, mention_time)",
];

const EVENT_COLUMNS: &str = "global_event_id, event_date, event_code, actor1_name, actor2_name, \
     avg_tone, num_mentions, \
     action_geo_type, action_geo_full_name, action_geo_lat, action_geo_long, \
     actor1_geo_type, actor1_geo_full_name, actor1_geo_lat, actor1_geo_long, \
     actor2_geo_type, actor2_geo_full_name, actor2_geo_lat, actor2_geo_long";

/// Open the store database read-only
///
/// Uses SQLite mode=ro plus immutable=1 so no write, not even journal
/// maintenance, can happen through this pool.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "Database not found: {} (populated by the ingestion pipeline)",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=ro&immutable=1", db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _em_write_probe (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            return Err(Error::Internal(
                "Database connection is not read-only".to_string(),
            ));
        }
    }

    Ok(pool)
}

/// Create the store tables on a writable pool
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn find_events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<EventRecord>> {
        let sql = format!(
            "SELECT {} FROM events
             WHERE event_date >= ? AND event_date < ?
             ORDER BY event_date DESC, global_event_id ASC
             LIMIT ?",
            EVENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(to_epoch_millis(start))
            .bind(to_epoch_millis(end))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        debug!("Fetched {} event rows", rows.len());
        rows.iter().map(decode_event).collect()
    }

    async fn find_event(&self, global_event_id: i64) -> Result<Option<EventRecord>> {
        let sql = format!("SELECT {} FROM events WHERE global_event_id = ?", EVENT_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(global_event_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_event).transpose()
    }

    async fn find_mentions(
        &self,
        global_event_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MentionRecord>> {
        let rows = sqlx::query(
            "SELECT global_event_id, mention_time, mention_source_name, mention_identifier, mention_doc_tone
             FROM mentions
             WHERE global_event_id = ? AND mention_time >= ? AND mention_time <= ?
             ORDER BY mention_time ASC",
        )
        .bind(global_event_id)
        .bind(to_epoch_millis(start))
        .bind(to_epoch_millis(end))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_mention).collect()
    }
}

/// Decode one `events` row
pub fn decode_event(row: &SqliteRow) -> Result<EventRecord> {
    let global_event_id: i64 = row.try_get("global_event_id")?;

    Ok(EventRecord {
        global_event_id,
        event_date: decode_timestamp(row, "event_date")?,
        event_code: row.try_get("event_code")?,
        actor1_name: row.try_get("actor1_name")?,
        actor2_name: row.try_get("actor2_name")?,
        avg_tone: row.try_get("avg_tone")?,
        num_mentions: row.try_get("num_mentions")?,
        action_geo: decode_geolocation(row, "action_geo")?,
        actor1_geo: decode_geolocation(row, "actor1_geo")?,
        actor2_geo: decode_geolocation(row, "actor2_geo")?,
    })
}

/// Decode one `mentions` row
pub fn decode_mention(row: &SqliteRow) -> Result<MentionRecord> {
    Ok(MentionRecord {
        global_event_id: row.try_get("global_event_id")?,
        mention_time: decode_timestamp(row, "mention_time")?,
        source_name: row.try_get("mention_source_name")?,
        identifier: row.try_get("mention_identifier")?,
        doc_tone: row.try_get("mention_doc_tone")?,
    })
}

/// `{prefix}_type`, `{prefix}_full_name`, `{prefix}_lat`, `{prefix}_long`.
/// The point is present only when both coordinates are.
fn decode_geolocation(row: &SqliteRow, prefix: &str) -> Result<Geolocation> {
    let precision: Option<i32> = row.try_get(format!("{}_type", prefix).as_str())?;
    let full_name: Option<String> = row.try_get(format!("{}_full_name", prefix).as_str())?;
    let lat: Option<f64> = row.try_get(format!("{}_lat", prefix).as_str())?;
    let lon: Option<f64> = row.try_get(format!("{}_long", prefix).as_str())?;

    Ok(Geolocation {
        precision,
        full_name,
        point: lat.zip(lon).map(|(lat, lon)| GeoPoint::new(lat, lon)),
    })
}

fn decode_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let millis: i64 = row.try_get(column)?;
    from_epoch_millis(millis)
        .ok_or_else(|| Error::Internal(format!("{} out of range: {}", column, millis)))
}
