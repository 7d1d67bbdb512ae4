use rusqlite::Connection;

use crate::error::Result;

/// Initialise the podcast and episode tables.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_podcasts_table(conn)?;
    create_episodes_table(conn)?;
    Ok(())
}

fn create_podcasts_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS podcasts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            host        TEXT NOT NULL,
            description TEXT
        );",
    )?;
    Ok(())
}

/// `podcast_id` has no foreign key: episodes may exist without a podcast,
/// and podcast deletion removes its episodes itself.
fn create_episodes_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS episodes (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            podcast_id     INTEGER,
            scheduled_date TEXT NOT NULL,   -- YYYY-MM-DD or YYYY-MM-DDTHH:MM
            title          TEXT NOT NULL,
            type           TEXT,
            guest          TEXT,
            theme          TEXT,
            description    TEXT,
            announcement   TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_episodes_date
            ON episodes(scheduled_date);
        CREATE INDEX IF NOT EXISTS idx_episodes_podcast
            ON episodes(podcast_id, scheduled_date);",
    )?;
    Ok(())
}
