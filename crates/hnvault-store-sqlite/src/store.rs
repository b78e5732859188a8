//! [`SqliteStore`] — the SQLite implementation of [`ArchiveStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use hnvault_core::{
  ItemId,
  record::{CommentRecord, StoryRecord},
  store::{ArchiveStore, TableCounts},
};

use crate::{
  Result,
  encode::{RawComment, RawStory, decode_count, decode_id, encode_id, encode_ts},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An hnvault archive backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every write
/// is a single statement and commits on its own.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    debug!(path = %path.as_ref().display(), "Opening archive database");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, surfacing any error SQLite reports.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_ids(&self, sql: &'static str, param: i64) -> Result<Vec<ItemId>> {
    let raws: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(decode_id).collect()
  }
}

// ─── ArchiveStore impl ───────────────────────────────────────────────────────

impl ArchiveStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn upsert_story(&self, story: StoryRecord) -> Result<()> {
    let raw = RawStory::encode(story)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO stories (
             id, \"by\", score, comment_count, time,
             title, type, url, time_str, synced_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            raw.id,
            raw.by,
            raw.score,
            raw.comment_count,
            raw.time,
            raw.title,
            raw.kind,
            raw.url,
            raw.time_str,
            raw.synced_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_comment(&self, comment: CommentRecord) -> Result<()> {
    let raw = RawComment::encode(comment)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO comments (
             id, \"by\", parent, text, time, type, time_str, synced_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            raw.id,
            raw.by,
            raw.parent,
            raw.text,
            raw.time,
            raw.kind,
            raw.time_str,
            raw.synced_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn max_item_id(&self) -> Result<ItemId> {
    let max: Option<i64> = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT MAX(id) FROM (
             SELECT id FROM stories UNION ALL SELECT id FROM comments
           )",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    max.map(decode_id).transpose().map(Option::unwrap_or_default)
  }

  async fn story_ids(&self, limit: Option<usize>) -> Result<Vec<ItemId>> {
    // A negative LIMIT means no limit in SQLite.
    let limit_val = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    self
      .query_ids("SELECT id FROM stories ORDER BY id LIMIT ?1", limit_val)
      .await
  }

  async fn stories_synced_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<ItemId>> {
    self
      .query_ids(
        "SELECT id FROM stories WHERE synced_at < ?1 ORDER BY id",
        encode_ts(cutoff),
      )
      .await
  }

  async fn get_story(&self, id: ItemId) -> Result<Option<StoryRecord>> {
    let id_val = encode_id(id)?;
    let sql = format!("SELECT {} FROM stories WHERE id = ?1", RawStory::COLUMNS);

    let raw: Option<RawStory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_val], RawStory::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStory::into_story).transpose()
  }

  async fn get_comment(&self, id: ItemId) -> Result<Option<CommentRecord>> {
    let id_val = encode_id(id)?;
    let sql = format!("SELECT {} FROM comments WHERE id = ?1", RawComment::COLUMNS);

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_val], RawComment::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn counts(&self) -> Result<TableCounts> {
    let (stories, comments): (i64, i64) = self
      .conn
      .call(|conn| {
        let stories: i64 = conn.query_row("SELECT COUNT(*) FROM stories", [], |r| r.get(0))?;
        let comments: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?;
        Ok((stories, comments))
      })
      .await?;

    Ok(TableCounts {
      stories:  decode_count(stories)?,
      comments: decode_count(comments)?,
    })
  }
}
