use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    db::init_db,
    error::{Result, StoreError},
};

/// A persisted weekly post record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPost {
    /// Row ID — assigned by SQLite, immutable after creation.
    pub id: i64,
    /// Message body, sent verbatim.
    pub content: String,
    /// 0 = Monday … 6 = Sunday.
    pub day_of_week: u8,
    /// 0-23 UTC.
    pub hour: u8,
    /// Always 0 or 30.
    pub minute: u8,
    /// ISO-8601 timestamp of row creation.
    pub created_at: String,
    /// ISO-8601 timestamp of the last mutation.
    pub updated_at: String,
}

/// Check the half-hour rule and the data-model ranges before a write.
///
/// Runs on every mutation path (create and update), so an invalid minute can
/// never reach the `weekly_posts` table regardless of how it got here.
fn validate(content: &str, day_of_week: u8, hour: u8, minute: u8) -> Result<()> {
    if content.is_empty() {
        return Err(StoreError::EmptyContent);
    }
    if day_of_week > 6 {
        return Err(StoreError::InvalidDayOfWeek { day: day_of_week });
    }
    if hour > 23 {
        return Err(StoreError::InvalidHour { hour });
    }
    if minute != 0 && minute != 30 {
        return Err(StoreError::InvalidMinute { minute });
    }
    Ok(())
}

/// Shared handle for weekly post CRUD.
///
/// Wraps its own `Connection` behind a mutex so the command surface and the
/// dispatch loop can hold clones of the same handle from separate tasks.
#[derive(Clone)]
pub struct PostStore {
    conn: Arc<Mutex<Connection>>,
}

impl PostStore {
    /// Create a store over `conn`, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new post. Validation runs before the row is written.
    pub fn create(&self, content: &str, day_of_week: u8, hour: u8, minute: u8) -> Result<WeeklyPost> {
        validate(content, day_of_week, hour, minute)?;

        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO weekly_posts
             (content, day_of_week, hour, minute, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![content, day_of_week, hour, minute, now],
        )?;
        let id = conn.last_insert_rowid();

        info!(post_id = id, day_of_week, hour, minute, "weekly post created");

        Ok(WeeklyPost {
            id,
            content: content.to_string(),
            day_of_week,
            hour,
            minute,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Return every post scheduled for `day_of_week`, oldest first.
    ///
    /// The result is a materialized snapshot; rows added after this call
    /// are simply not in it.
    pub fn get_by_day_of_week(&self, day_of_week: u8) -> Result<Vec<WeeklyPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, content, day_of_week, hour, minute, created_at, updated_at
             FROM weekly_posts WHERE day_of_week = ?1 ORDER BY id",
        )?;
        let posts = stmt
            .query_map([day_of_week], map_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    /// Return all known posts ordered by creation.
    pub fn list(&self) -> Result<Vec<WeeklyPost>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, day_of_week, hour, minute, created_at, updated_at
             FROM weekly_posts ORDER BY id",
        )?;
        let posts = stmt
            .query_map([], map_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(posts)
    }

    /// Fetch one post by ID.
    pub fn get(&self, id: i64) -> Result<WeeklyPost> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, content, day_of_week, hour, minute, created_at, updated_at
             FROM weekly_posts WHERE id = ?1",
        )?;
        stmt.query_row([id], map_post)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::PostNotFound { id },
                other => StoreError::Database(other),
            })
    }

    /// Update a post in place. `None` fields keep their current value.
    ///
    /// The merged row is re-validated before the write, so updating a
    /// stored post's minute to, say, 15 is rejected the same way a bad
    /// create is. `updated_at` is refreshed; `created_at` never changes.
    pub fn update(
        &self,
        id: i64,
        content: Option<&str>,
        day_of_week: Option<u8>,
        hour: Option<u8>,
        minute: Option<u8>,
    ) -> Result<WeeklyPost> {
        let mut post = self.get(id)?;
        if let Some(content) = content {
            post.content = content.to_string();
        }
        if let Some(day) = day_of_week {
            post.day_of_week = day;
        }
        if let Some(hour) = hour {
            post.hour = hour;
        }
        if let Some(minute) = minute {
            post.minute = minute;
        }
        validate(&post.content, post.day_of_week, post.hour, post.minute)?;

        let conn = self.conn.lock().unwrap();
        post.updated_at = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE weekly_posts
             SET content = ?1, day_of_week = ?2, hour = ?3, minute = ?4, updated_at = ?5
             WHERE id = ?6",
            rusqlite::params![
                post.content,
                post.day_of_week,
                post.hour,
                post.minute,
                post.updated_at,
                id
            ],
        )?;

        info!(post_id = id, "weekly post updated");
        Ok(post)
    }

    /// Delete a post by ID. Returns `PostNotFound` if no row is deleted.
    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM weekly_posts WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::PostNotFound { id });
        }
        info!(post_id = id, "weekly post deleted");
        Ok(())
    }
}

fn map_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<WeeklyPost> {
    Ok(WeeklyPost {
        id: row.get(0)?,
        content: row.get(1)?,
        day_of_week: row.get(2)?,
        hour: row.get(3)?,
        minute: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
