//! Archived rows — what the store persists for stories and comments.
//!
//! Records are built from a fetched [`Item`] at write time. `synced_at` is the
//! wall-clock time of the write and supports staleness queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  item::{Item, ItemId, ItemKind},
};

/// Format used for the human-readable `time_str` column.
pub const TIME_STR_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a unix timestamp as `time_str`. `None` if out of range.
pub fn format_time(secs: i64) -> Option<String> {
  DateTime::from_timestamp(secs, 0).map(|dt| dt.format(TIME_STR_FORMAT).to_string())
}

fn time_fields(item: &Item) -> Result<(i64, String)> {
  let malformed = || Error::MalformedItem { id: item.id, field: "time" };
  let time = item.time.ok_or_else(malformed)?;
  let time_str = format_time(time).ok_or_else(malformed)?;
  Ok((time, time_str))
}

// ─── Stories ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
  pub id:            ItemId,
  pub by:            Option<String>,
  pub score:         i64,
  pub comment_count: i64,
  pub time:          i64,
  pub title:         String,
  pub kind:          ItemKind,
  pub url:           Option<String>,
  pub time_str:      String,
  pub synced_at:     DateTime<Utc>,
}

impl StoryRecord {
  /// Requires `time` and `title`; a missing score or reply count is 0.
  pub fn from_item(item: Item, synced_at: DateTime<Utc>) -> Result<Self> {
    let (time, time_str) = time_fields(&item)?;
    let title = item
      .title
      .ok_or(Error::MalformedItem { id: item.id, field: "title" })?;

    Ok(Self {
      id: item.id,
      by: item.by,
      score: item.score.unwrap_or(0),
      comment_count: item.descendants.unwrap_or(0),
      time,
      title,
      kind: item.kind,
      url: item.url,
      time_str,
      synced_at,
    })
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
  pub id:        ItemId,
  pub by:        Option<String>,
  pub parent:    ItemId,
  pub text:      Option<String>,
  pub time:      i64,
  pub kind:      ItemKind,
  pub time_str:  String,
  pub synced_at: DateTime<Utc>,
}

impl CommentRecord {
  /// Requires `time` and `parent`.
  pub fn from_item(item: Item, synced_at: DateTime<Utc>) -> Result<Self> {
    let (time, time_str) = time_fields(&item)?;
    let parent = item
      .parent
      .ok_or(Error::MalformedItem { id: item.id, field: "parent" })?;

    Ok(Self {
      id: item.id,
      by: item.by,
      parent,
      text: item.text,
      time,
      kind: item.kind,
      time_str,
      synced_at,
    })
  }
}
