//! Cache Entry DAO
//!
//! Typed access to the `http_cache` table. Freshness and eviction policy live
//! in [`FledgeHttpCache`](super::FledgeHttpCache); this layer only runs the
//! queries it is asked to run.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::entry::CacheEntry;
use super::headers::{deserialize_response_headers, serialize_response_headers};
use crate::db::Database;
use crate::error::Result;

const SELECT_COLUMNS: &str =
    "url, response_body, response_headers, creation_timestamp, max_age_seconds";

// == Cache Entry DAO ==
#[derive(Debug, Clone)]
pub struct CacheEntryDao {
    db: Database,
}

impl CacheEntryDao {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // == Persist ==
    /// Inserts `entry`, replacing any row with the same url.
    pub fn persist(&self, entry: &CacheEntry) -> Result<()> {
        self.db.lock().execute(
            "INSERT OR REPLACE INTO http_cache
                (url, response_body, response_headers, creation_timestamp, max_age_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.url,
                entry.response_body,
                serialize_response_headers(&entry.response_headers),
                entry.creation_timestamp.timestamp_millis(),
                to_sql_int(entry.max_age_seconds),
            ],
        )?;
        Ok(())
    }

    // == Get Entry ==
    /// Returns the row for `url` if it is still fresh at `now` by its own max-age.
    ///
    /// Stale rows are left in place.
    pub fn get_entry(&self, url: &str, now: DateTime<Utc>) -> Result<Option<CacheEntry>> {
        let conn = self.db.lock();
        let entry = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM http_cache
                     WHERE url = ?1 AND creation_timestamp + max_age_seconds * 1000 >= ?2"
                ),
                params![url, now.timestamp_millis()],
                map_entry_row,
            )
            .optional()?;
        Ok(entry)
    }

    // == Count ==
    /// Number of stored rows, stale or not.
    pub fn get_entries_count(&self) -> Result<u64> {
        let count: i64 = self
            .db
            .lock()
            .query_row("SELECT COUNT(*) FROM http_cache", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    // == Delete Expired ==
    /// Deletes rows older than `max_age_seconds` at `now`, ignoring each row's
    /// own max-age. Returns the number of rows removed.
    pub fn delete_expired(&self, max_age_seconds: u64, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.db.lock().execute(
            "DELETE FROM http_cache WHERE creation_timestamp + ?1 * 1000 < ?2",
            params![to_sql_int(max_age_seconds), now.timestamp_millis()],
        )?;
        Ok(removed)
    }

    // == Prune ==
    /// Keeps only the `max_entries` most recently created rows (FIFO eviction).
    /// Returns the number of rows removed.
    pub fn prune(&self, max_entries: u64) -> Result<usize> {
        // rowid breaks ties between rows stored within the same millisecond
        let removed = self.db.lock().execute(
            "DELETE FROM http_cache WHERE url NOT IN (
                SELECT url FROM http_cache
                ORDER BY creation_timestamp DESC, rowid DESC
                LIMIT ?1
             )",
            params![to_sql_int(max_entries)],
        )?;
        Ok(removed)
    }

    // == Delete All ==
    pub fn delete_all(&self) -> Result<usize> {
        let removed = self.db.lock().execute("DELETE FROM http_cache", [])?;
        Ok(removed)
    }
}

fn map_entry_row(row: &Row<'_>) -> rusqlite::Result<CacheEntry> {
    let created_millis: i64 = row.get(3)?;
    let creation_timestamp = DateTime::from_timestamp_millis(created_millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, created_millis))?;
    let max_age: i64 = row.get(4)?;
    let max_age_seconds =
        u64::try_from(max_age).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(4, max_age))?;
    let headers: String = row.get(2)?;

    Ok(CacheEntry {
        url: row.get(0)?,
        response_body: row.get(1)?,
        response_headers: deserialize_response_headers(&headers),
        creation_timestamp,
        max_age_seconds,
    })
}

/// SQLite integers are signed; saturate rather than wrap.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
