use std::sync::{Mutex, MutexGuard};

use podplan_calendar::{EpisodeSource, SourceError};
use podplan_core::types::non_blank;
use podplan_core::{DateRange, Episode, EpisodeForm, EpisodeId, Podcast, PodcastForm, PodcastId};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};

const PODCAST_COLUMNS: &str = "id, title, host, description";
const EPISODE_COLUMNS: &str =
    "id, podcast_id, scheduled_date, title, type, guest, theme, description, announcement";
const EPISODE_ORDER: &str = "ORDER BY scheduled_date ASC, id ASC";
/// Stored dates all start with `YYYY-MM-DD`, so a text range on the column
/// selects the candidate days through `idx_episodes_date`.
const RANGE_CLAUSE: &str = "WHERE scheduled_date >= ?1 AND scheduled_date < ?2";
const OPEN_RANGE_CLAUSE: &str = "WHERE scheduled_date >= ?1";

/// Map a SELECT row (column order from PODCAST_COLUMNS) to a Podcast.
pub(crate) fn row_to_podcast(row: &rusqlite::Row<'_>) -> rusqlite::Result<Podcast> {
    Ok(Podcast {
        id: row.get(0)?,
        title: row.get(1)?,
        host: row.get(2)?,
        description: row.get(3)?,
    })
}

/// Map a SELECT row (column order from EPISODE_COLUMNS) to an Episode.
pub(crate) fn row_to_episode(row: &rusqlite::Row<'_>) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: row.get(0)?,
        podcast_id: row.get(1)?,
        scheduled_date: row.get(2)?,
        title: row.get(3)?,
        kind: row.get(4)?,
        guest: row.get(5)?,
        theme: row.get(6)?,
        description: row.get(7)?,
        announcement: row.get(8)?,
    })
}

fn fetch_episode(db: &Connection, id: EpisodeId) -> Result<Option<Episode>> {
    let episode = db
        .query_row(
            &format!("SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = ?1"),
            [id],
            row_to_episode,
        )
        .optional()?;
    Ok(episode)
}

/// Episode reads treat a missing `episodes` table as "nothing scheduled yet".
fn or_empty<T: Default>(result: Result<T>) -> Result<T> {
    match result {
        Err(StoreError::MissingTable(table)) => {
            debug!(%table, "table missing; returning empty result");
            Ok(T::default())
        }
        other => other,
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Thread-safe access to the podcast catalog.
///
/// Every operation holds the connection only for its own statements; no
/// transaction spans more than one call.
pub struct CatalogStore {
    db: Mutex<Connection>,
}

impl CatalogStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| StoreError::Poisoned)
    }

    // --- podcasts ----------------------------------------------------------

    #[instrument(skip(self))]
    pub fn list_podcasts(&self) -> Result<Vec<Podcast>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!("SELECT {PODCAST_COLUMNS} FROM podcasts ORDER BY id"))?;
        let podcasts = stmt
            .query_map([], row_to_podcast)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(podcasts)
    }

    #[instrument(skip(self))]
    pub fn get_podcast(&self, id: PodcastId) -> Result<Option<Podcast>> {
        let db = self.conn()?;
        let podcast = db
            .query_row(
                &format!("SELECT {PODCAST_COLUMNS} FROM podcasts WHERE id = ?1"),
                [id],
                row_to_podcast,
            )
            .optional()?;
        Ok(podcast)
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    pub fn create_podcast(&self, form: &PodcastForm) -> Result<Podcast> {
        let db = self.conn()?;
        let description = non_blank(&form.description);
        db.execute(
            "INSERT INTO podcasts (title, host, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![form.title, form.host, description],
        )?;
        let id = db.last_insert_rowid();
        info!(podcast_id = id, "podcast created");
        Ok(Podcast {
            id,
            title: form.title.clone(),
            host: form.host.clone(),
            description: description.map(String::from),
        })
    }

    /// Returns `false` when no podcast has that id.
    #[instrument(skip(self, form))]
    pub fn update_podcast(&self, id: PodcastId, form: &PodcastForm) -> Result<bool> {
        let db = self.conn()?;
        let n = db.execute(
            "UPDATE podcasts SET title = ?1, host = ?2, description = ?3 WHERE id = ?4",
            rusqlite::params![form.title, form.host, non_blank(&form.description), id],
        )?;
        info!(podcast_id = id, updated = n, "podcast updated");
        Ok(n > 0)
    }

    /// Delete a podcast together with every episode that references it.
    /// Both deletes commit or neither does. Returns the number of episodes
    /// removed.
    #[instrument(skip(self))]
    pub fn delete_podcast(&self, id: PodcastId) -> Result<usize> {
        let mut db = self.conn()?;
        let tx = db.transaction()?;
        let podcasts = tx.execute("DELETE FROM podcasts WHERE id = ?1", [id])?;
        let episodes = tx.execute("DELETE FROM episodes WHERE podcast_id = ?1", [id])?;
        tx.commit()?;
        info!(podcast_id = id, podcasts, episodes, "podcast deleted");
        Ok(episodes)
    }

    // --- episodes ----------------------------------------------------------

    fn select_episodes<P: rusqlite::Params>(&self, clause: &str, params: P) -> Result<Vec<Episode>> {
        let db = self.conn()?;
        let mut stmt = db.prepare(&format!("SELECT {EPISODE_COLUMNS} FROM episodes {clause}"))?;
        let episodes = stmt
            .query_map(params, row_to_episode)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(episodes)
    }

    /// Episodes dated within `range`, in date order.
    ///
    /// SQLite narrows the rows by text prefix; the typed parse then drops
    /// candidates whose stored date is not in a recognised layout.
    fn select_in_range(&self, range: &DateRange) -> Result<Vec<Episode>> {
        let start = range.start.to_string();
        let candidates = match range.end.succ_opt() {
            Some(after) => self.select_episodes(
                &format!("{RANGE_CLAUSE} {EPISODE_ORDER}"),
                rusqlite::params![start, after.to_string()],
            )?,
            None => self.select_episodes(&format!("{OPEN_RANGE_CLAUSE} {EPISODE_ORDER}"), [start])?,
        };
        let fetched = candidates.len();
        let matched: Vec<Episode> = candidates
            .into_iter()
            .filter(|e| e.scheduled().is_some_and(|sd| range.contains(sd.date)))
            .collect();
        debug!(start = %range.start, end = %range.end, fetched, matched = matched.len(), "range query");
        Ok(matched)
    }

    #[instrument(skip(self))]
    pub fn podcast_episodes(&self, podcast_id: PodcastId) -> Result<Vec<Episode>> {
        or_empty(self.select_episodes(&format!("WHERE podcast_id = ?1 {EPISODE_ORDER}"), [podcast_id]))
    }

    /// All episodes in date order, optionally limited to `filter`.
    #[instrument(skip(self))]
    pub fn list_episodes(&self, filter: Option<&DateRange>) -> Result<Vec<Episode>> {
        match filter {
            Some(range) => or_empty(self.select_in_range(range)),
            None => or_empty(self.select_episodes(EPISODE_ORDER, rusqlite::params![])),
        }
    }

    /// Case-insensitive substring match on title, guest, theme and
    /// description. A blank query matches nothing.
    #[instrument(skip(self))]
    pub fn search_episodes(&self, query: &str) -> Result<Vec<Episode>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        or_empty(self.select_episodes(
            &format!(
                "WHERE title LIKE ?1 ESCAPE '\\' OR guest LIKE ?1 ESCAPE '\\'
                    OR theme LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\'
                 {EPISODE_ORDER}"
            ),
            [like_pattern(query)],
        ))
    }

    #[instrument(skip(self))]
    pub fn get_episode(&self, id: EpisodeId) -> Result<Option<Episode>> {
        let db = self.conn()?;
        or_empty(fetch_episode(&db, id))
    }

    #[instrument(skip(self, form), fields(title = %form.title))]
    pub fn create_episode(&self, podcast_id: Option<PodcastId>, form: &EpisodeForm) -> Result<Episode> {
        let db = self.conn()?;
        let kind = form.resolved_kind();
        db.execute(
            "INSERT INTO episodes
             (podcast_id, scheduled_date, title, type, guest, theme, description, announcement)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                podcast_id,
                form.scheduled_date,
                form.title,
                kind,
                non_blank(&form.guest),
                non_blank(&form.theme),
                non_blank(&form.description),
                non_blank(&form.announcement),
            ],
        )?;
        let id = db.last_insert_rowid();
        info!(episode_id = id, ?podcast_id, date = %form.scheduled_date, "episode scheduled");
        Ok(Episode {
            id,
            podcast_id,
            scheduled_date: form.scheduled_date.clone(),
            title: form.title.clone(),
            kind: Some(kind),
            guest: non_blank(&form.guest).map(String::from),
            theme: non_blank(&form.theme).map(String::from),
            description: non_blank(&form.description).map(String::from),
            announcement: non_blank(&form.announcement).map(String::from),
        })
    }

    /// Rewrite every editable field. `podcast_id` is left untouched.
    /// Returns `false` when no episode has that id.
    #[instrument(skip(self, form))]
    pub fn update_episode(&self, id: EpisodeId, form: &EpisodeForm) -> Result<bool> {
        let db = self.conn()?;
        let n = db.execute(
            "UPDATE episodes SET title = ?1, scheduled_date = ?2, type = ?3, guest = ?4,
                    theme = ?5, description = ?6, announcement = ?7
             WHERE id = ?8",
            rusqlite::params![
                form.title,
                form.scheduled_date,
                form.resolved_kind(),
                non_blank(&form.guest),
                non_blank(&form.theme),
                non_blank(&form.description),
                non_blank(&form.announcement),
                id,
            ],
        )?;
        info!(episode_id = id, updated = n, "episode updated");
        Ok(n > 0)
    }

    /// Remove an episode, returning it as it was if it existed.
    ///
    /// Lookup and delete run under one lock. An unknown id, or a missing
    /// `episodes` table, deletes nothing and returns `None`.
    #[instrument(skip(self))]
    pub fn delete_episode(&self, id: EpisodeId) -> Result<Option<Episode>> {
        let db = self.conn()?;
        let removed = or_empty(fetch_episode(&db, id))?;
        if removed.is_some() {
            let n = db.execute("DELETE FROM episodes WHERE id = ?1", [id])?;
            info!(episode_id = id, deleted = n, "episode deleted");
        }
        Ok(removed)
    }

    /// Move an episode to `new_date` as given, without validation.
    /// Returns the number of rows changed (0 when the id is unknown).
    #[instrument(skip(self))]
    pub fn update_episode_date(&self, id: EpisodeId, new_date: &str) -> Result<usize> {
        let db = self.conn()?;
        let n = db.execute(
            "UPDATE episodes SET scheduled_date = ?1 WHERE id = ?2",
            rusqlite::params![new_date, id],
        )?;
        info!(episode_id = id, %new_date, updated = n, "episode rescheduled");
        Ok(n)
    }

    /// Row counts of (podcasts, episodes).
    pub fn counts(&self) -> Result<(u64, u64)> {
        let db = self.conn()?;
        let podcasts: u64 = db.query_row("SELECT COUNT(*) FROM podcasts", [], |r| r.get(0))?;
        let episodes: u64 = db.query_row("SELECT COUNT(*) FROM episodes", [], |r| r.get(0))?;
        Ok((podcasts, episodes))
    }
}

impl EpisodeSource for CatalogStore {
    fn episodes_in(&self, range: &DateRange) -> std::result::Result<Vec<Episode>, SourceError> {
        self.select_in_range(range).map_err(|e| match e {
            StoreError::MissingTable(_) => SourceError::MissingCollection,
            other => SourceError::Backend(other.to_string()),
        })
    }
}
