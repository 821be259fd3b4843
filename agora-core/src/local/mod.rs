//! On-device event cache backed by SQLite.
//!
//! The cache holds one row per natural key. Tombstones remember deleted keys
//! so a later sync cannot bring them back.

mod row;

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AgoraResult;
use crate::event::{Event, NaturalKey};
use row::{EventRow, TombstoneRow};

const CREATE_EVENTS: &str = "
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        date TEXT NOT NULL,
        location TEXT NOT NULL,
        liked INTEGER NOT NULL DEFAULT 0,
        UNIQUE(title, date)
    )";

const CREATE_TOMBSTONES: &str = "
    CREATE TABLE IF NOT EXISTS tombstones (
        title TEXT NOT NULL,
        date TEXT NOT NULL,
        deleted_at TEXT NOT NULL,
        PRIMARY KEY (title, date)
    )";

#[derive(Clone)]
pub struct LocalCache {
    pool: SqlitePool,
}

impl LocalCache {
    /// Open (or create) the cache database at `path`.
    pub async fn open(path: &Path) -> AgoraResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let cache = LocalCache { pool };
        cache.initialize().await?;
        tracing::debug!(path = %path.display(), "opened event cache");
        Ok(cache)
    }

    /// A private in-memory cache. Uses a single long-lived connection since
    /// every SQLite memory connection is its own database.
    pub async fn in_memory() -> AgoraResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let cache = LocalCache { pool };
        cache.initialize().await?;
        Ok(cache)
    }

    async fn initialize(&self) -> AgoraResult<()> {
        sqlx::query(CREATE_EVENTS).execute(&self.pool).await?;
        sqlx::query(CREATE_TOMBSTONES).execute(&self.pool).await?;
        Ok(())
    }

    /// Every cached event, in no particular order.
    pub async fn list_all(&self) -> AgoraResult<Vec<Event>> {
        let rows: Vec<EventRow> =
            sqlx::query_as("SELECT id, title, date, location, liked FROM events")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    pub async fn find(&self, key: &NaturalKey) -> AgoraResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(
            "SELECT id, title, date, location, liked FROM events WHERE title = ? AND date = ?",
        )
        .bind(&key.title)
        .bind(key.date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    /// Insert the event, or overwrite location and liked state of the row
    /// sharing its natural key. Returns the stored record.
    pub async fn upsert(&self, event: &Event) -> AgoraResult<Event> {
        let row: EventRow = sqlx::query_as(
            "INSERT INTO events (title, date, location, liked) VALUES (?, ?, ?, ?)
             ON CONFLICT(title, date) DO UPDATE SET
                location = excluded.location,
                liked = excluded.liked
             RETURNING id, title, date, location, liked",
        )
        .bind(&event.title)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.liked)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(key = %event.key(), liked = event.liked, "upserted event");
        Ok(row.into())
    }

    /// Delete the row matching every field of `event`. Returns whether a row
    /// was deleted.
    pub async fn remove(&self, event: &Event) -> AgoraResult<bool> {
        let result = sqlx::query(
            "DELETE FROM events WHERE title = ? AND date = ? AND location = ? AND liked = ?",
        )
        .bind(&event.title)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.liked)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_by_key(&self, key: &NaturalKey) -> AgoraResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE title = ? AND date = ?")
            .bind(&key.title)
            .bind(key.date)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%key, removed = result.rows_affected(), "removed event");
        Ok(result.rows_affected() > 0)
    }

    /// Insert the events whose natural key is neither cached nor tombstoned,
    /// in one transaction. Returns the events actually inserted.
    pub async fn insert_new(&self, events: &[Event]) -> AgoraResult<Vec<Event>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::new();

        for event in events {
            let tombstoned: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM tombstones WHERE title = ? AND date = ?")
                    .bind(&event.title)
                    .bind(event.date)
                    .fetch_one(&mut *tx)
                    .await?;

            if tombstoned > 0 {
                continue;
            }

            let row: Option<EventRow> = sqlx::query_as(
                "INSERT INTO events (title, date, location, liked) VALUES (?, ?, ?, ?)
                 ON CONFLICT(title, date) DO NOTHING
                 RETURNING id, title, date, location, liked",
            )
            .bind(&event.title)
            .bind(event.date)
            .bind(&event.location)
            .bind(event.liked)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = row {
                inserted.push(Event::from(row));
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    // TOMBSTONES:

    pub async fn add_tombstone(&self, key: &NaturalKey) -> AgoraResult<()> {
        sqlx::query(
            "INSERT INTO tombstones (title, date, deleted_at) VALUES (?, ?, ?)
             ON CONFLICT(title, date) DO UPDATE SET deleted_at = excluded.deleted_at",
        )
        .bind(&key.title)
        .bind(key.date)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn clear_tombstone(&self, key: &NaturalKey) -> AgoraResult<()> {
        sqlx::query("DELETE FROM tombstones WHERE title = ? AND date = ?")
            .bind(&key.title)
            .bind(key.date)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn tombstones(&self) -> AgoraResult<HashSet<NaturalKey>> {
        let rows: Vec<TombstoneRow> = sqlx::query_as("SELECT title, date FROM tombstones")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(NaturalKey::from).collect())
    }
}
