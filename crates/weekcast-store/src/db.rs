use rusqlite::Connection;

use crate::error::Result;

/// Initialise the weekly post schema in `conn`.
///
/// Creates the `weekly_posts` table (idempotent) and an index on
/// `day_of_week` so the dispatch loop's daily filter stays cheap.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS weekly_posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            content     TEXT    NOT NULL,
            day_of_week INTEGER NOT NULL,   -- 0=Monday … 6=Sunday
            hour        INTEGER NOT NULL,   -- 0-23 UTC
            minute      INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT    NOT NULL,   -- ISO-8601
            updated_at  TEXT    NOT NULL
        ) STRICT;

        -- The dispatch loop reads: SELECT … WHERE day_of_week = ?
        CREATE INDEX IF NOT EXISTS idx_weekly_posts_day
            ON weekly_posts (day_of_week);
        ",
    )?;
    Ok(())
}
