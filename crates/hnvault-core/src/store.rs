//! The `ArchiveStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `hnvault-store-sqlite`).
//! The crawler depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  item::ItemId,
  record::{CommentRecord, StoryRecord},
};

/// Row counts of the two archive tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
  pub stories:  u64,
  pub comments: u64,
}

/// Abstraction over an archive backend with one table per record type.
///
/// Writes are upserts keyed on the item id: writing a record for an id that
/// is already stored replaces the old row whole.
pub trait ArchiveStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  fn upsert_story(
    &self,
    story: StoryRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn upsert_comment(
    &self,
    comment: CommentRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The sync cursor: the largest id across both tables, 0 when empty.
  fn max_item_id(
    &self,
  ) -> impl Future<Output = Result<ItemId, Self::Error>> + Send + '_;

  /// Stored story ids in ascending order, at most `limit` of them.
  fn story_ids(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<ItemId>, Self::Error>> + Send + '_;

  /// Ids of stories last written before `cutoff`, ascending.
  fn stories_synced_before(
    &self,
    cutoff: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<ItemId>, Self::Error>> + Send + '_;

  fn get_story(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<Option<StoryRecord>, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<Option<CommentRecord>, Self::Error>> + Send + '_;

  fn counts(
    &self,
  ) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;
}
