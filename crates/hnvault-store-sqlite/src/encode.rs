//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Item ids are stored as `INTEGER` (i64). `synced_at` is stored as unix
//! seconds, so it round-trips at second precision.

use chrono::{DateTime, Utc};
use hnvault_core::{
  ItemId, ItemKind,
  record::{CommentRecord, StoryRecord},
};

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn encode_id(id: ItemId) -> Result<i64> {
  i64::try_from(id).map_err(|_| Error::IdOutOfRange(id))
}

pub fn decode_id(raw: i64) -> Result<ItemId> {
  ItemId::try_from(raw).map_err(|_| Error::NegativeId(raw))
}

/// `COUNT(*)` comes back as a signed integer.
pub fn decode_count(raw: i64) -> Result<u64> {
  u64::try_from(raw).map_err(|_| Error::NegativeCount(raw))
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_ts(dt: DateTime<Utc>) -> i64 { dt.timestamp() }

pub fn decode_ts(secs: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp(secs, 0).ok_or(Error::TimestampOutOfRange(secs))
}

// ─── ItemKind ────────────────────────────────────────────────────────────────

pub fn encode_kind(kind: ItemKind) -> &'static str { kind.as_str() }

pub fn decode_kind(s: &str) -> ItemKind {
  match s {
    "story" => ItemKind::Story,
    "comment" => ItemKind::Comment,
    "job" => ItemKind::Job,
    "poll" => ItemKind::Poll,
    "pollopt" => ItemKind::PollOpt,
    _ => ItemKind::Other,
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `stories` row.
pub struct RawStory {
  pub id:            i64,
  pub by:            Option<String>,
  pub score:         i64,
  pub comment_count: i64,
  pub time:          i64,
  pub title:         String,
  pub kind:          String,
  pub url:           Option<String>,
  pub time_str:      String,
  pub synced_at:     i64,
}

impl RawStory {
  pub const COLUMNS: &'static str =
    "id, \"by\", score, comment_count, time, title, type, url, time_str, synced_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      by:            row.get(1)?,
      score:         row.get(2)?,
      comment_count: row.get(3)?,
      time:          row.get(4)?,
      title:         row.get(5)?,
      kind:          row.get(6)?,
      url:           row.get(7)?,
      time_str:      row.get(8)?,
      synced_at:     row.get(9)?,
    })
  }

  pub fn encode(story: StoryRecord) -> Result<Self> {
    Ok(Self {
      id:            encode_id(story.id)?,
      by:            story.by,
      score:         story.score,
      comment_count: story.comment_count,
      time:          story.time,
      title:         story.title,
      kind:          encode_kind(story.kind).to_owned(),
      url:           story.url,
      time_str:      story.time_str,
      synced_at:     encode_ts(story.synced_at),
    })
  }

  pub fn into_story(self) -> Result<StoryRecord> {
    Ok(StoryRecord {
      id:            decode_id(self.id)?,
      by:            self.by,
      score:         self.score,
      comment_count: self.comment_count,
      time:          self.time,
      title:         self.title,
      kind:          decode_kind(&self.kind),
      url:           self.url,
      time_str:      self.time_str,
      synced_at:     decode_ts(self.synced_at)?,
    })
  }
}

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub id:        i64,
  pub by:        Option<String>,
  pub parent:    i64,
  pub text:      Option<String>,
  pub time:      i64,
  pub kind:      String,
  pub time_str:  String,
  pub synced_at: i64,
}

impl RawComment {
  pub const COLUMNS: &'static str =
    "id, \"by\", parent, text, time, type, time_str, synced_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      by:        row.get(1)?,
      parent:    row.get(2)?,
      text:      row.get(3)?,
      time:      row.get(4)?,
      kind:      row.get(5)?,
      time_str:  row.get(6)?,
      synced_at: row.get(7)?,
    })
  }

  pub fn encode(comment: CommentRecord) -> Result<Self> {
    Ok(Self {
      id:        encode_id(comment.id)?,
      by:        comment.by,
      parent:    encode_id(comment.parent)?,
      text:      comment.text,
      time:      comment.time,
      kind:      encode_kind(comment.kind).to_owned(),
      time_str:  comment.time_str,
      synced_at: encode_ts(comment.synced_at),
    })
  }

  pub fn into_comment(self) -> Result<CommentRecord> {
    Ok(CommentRecord {
      id:        decode_id(self.id)?,
      by:        self.by,
      parent:    decode_id(self.parent)?,
      text:      self.text,
      time:      self.time,
      kind:      decode_kind(&self.kind),
      time_str:  self.time_str,
      synced_at: decode_ts(self.synced_at)?,
    })
  }
}
