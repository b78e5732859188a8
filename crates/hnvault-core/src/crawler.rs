//! The incremental crawler: sync driver and item processor.
//!
//! A run walks the id range between the archive's cursor and the remote's
//! max id, one id at a time, in ascending order. There is no explicit
//! checkpoint: the cursor is recomputed from what the store actually holds,
//! so an interrupted run resumes from its last persisted item.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  item::{ItemId, ItemKind},
  record::{CommentRecord, StoryRecord},
  source::ItemSource,
  store::ArchiveStore,
};

/// How far below the remote max id a first run starts.
pub const FIRST_RUN_LOOKBACK: ItemId = 1000;

/// Number of ids a test-mode sync walks. The window is clamped to the remote
/// max id, so test mode never requests ids the remote has not assigned.
pub const TEST_MODE_ID_SPAN: ItemId = 5;

/// Number of stories a test-mode refresh re-fetches.
pub const TEST_MODE_STORY_LIMIT: usize = 4;

/// A progress line is logged every this many processed ids.
pub const PROGRESS_INTERVAL: usize = 100;

/// Start id for a first run.
pub fn first_run_start(remote_max: ItemId) -> ItemId {
  remote_max.saturating_sub(FIRST_RUN_LOOKBACK)
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlerConfig {
  /// Start from a fixed lookback window instead of the stored cursor.
  pub first_run:     bool,
  /// Do not archive comments.
  pub skip_comments: bool,
  /// Bound every run to a handful of ids. Not exposed on the command line.
  pub test_mode:     bool,
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// What the processor did with one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  StoredStory,
  StoredComment,
  /// The item is flagged `deleted` or `dead`.
  SkippedFlagged,
  /// A comment, with comment archiving switched off.
  SkippedComment,
  SkippedOther(ItemKind),
  /// The remote has no item under this id.
  NotFound,
}

/// Per-run tally of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub attempted:        usize,
  pub stories:          usize,
  pub comments:         usize,
  pub skipped_flagged:  usize,
  pub skipped_comments: usize,
  pub skipped_other:    usize,
  pub not_found:        usize,
  pub failed:           usize,
}

impl SyncReport {
  fn record(&mut self, result: &Result<Outcome>) {
    self.attempted += 1;
    match result {
      Ok(Outcome::StoredStory) => self.stories += 1,
      Ok(Outcome::StoredComment) => self.comments += 1,
      Ok(Outcome::SkippedFlagged) => self.skipped_flagged += 1,
      Ok(Outcome::SkippedComment) => self.skipped_comments += 1,
      Ok(Outcome::SkippedOther(_)) => self.skipped_other += 1,
      Ok(Outcome::NotFound) => self.not_found += 1,
      Err(_) => self.failed += 1,
    }
  }

  /// Items written to either table.
  pub fn stored(&self) -> usize { self.stories + self.comments }
}

/// Counts processed ids and says when a progress line is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Progress {
  pub done:  usize,
  pub total: usize,
  every:     usize,
}

impl Progress {
  pub fn new(total: usize, every: usize) -> Self {
    Self { done: 0, total, every: every.max(1) }
  }

  /// Count one id. True on every `every`-th id and on the last one.
  pub fn tick(&mut self) -> bool {
    self.done += 1;
    self.done % self.every == 0 || self.done == self.total
  }
}

// ─── Crawler ─────────────────────────────────────────────────────────────────

/// Drives one archive run against a borrowed source and store.
pub struct Crawler<'a, C, S> {
  source: &'a C,
  store:  &'a S,
  config: CrawlerConfig,
}

impl<'a, C, S> Crawler<'a, C, S>
where
  C: ItemSource,
  S: ArchiveStore,
{
  pub fn new(source: &'a C, store: &'a S, config: CrawlerConfig) -> Self {
    Self { source, store, config }
  }

  pub fn config(&self) -> CrawlerConfig { self.config }

  /// The id after which this run starts fetching.
  pub async fn compute_start_id(&self, remote_max: ItemId) -> Result<ItemId> {
    if self.config.first_run {
      return Ok(first_run_start(remote_max));
    }
    self
      .store
      .max_item_id()
      .await
      .map_err(|e| Error::StoreRead(Box::new(e)))
  }

  /// Fetch and archive every id between the cursor and the remote max id.
  ///
  /// Fails only if the remote max id or the cursor cannot be read; per-item
  /// failures are logged and counted in the report.
  pub async fn fetch_new_items(&self) -> Result<SyncReport> {
    let mut remote_max = self
      .source
      .get_max_item_id()
      .await
      .map_err(|e| Error::MaxItemId(Box::new(e)))?;

    let start = self.compute_start_id(remote_max).await?;

    if self.config.test_mode {
      remote_max = remote_max.min(start.saturating_add(TEST_MODE_ID_SPAN));
    }

    info!(
      start,
      remote_max,
      count = remote_max.saturating_sub(start),
      "Fetching new items"
    );

    let total = usize::try_from(remote_max.saturating_sub(start)).unwrap_or(usize::MAX);
    let report = self.process_all(start + 1..=remote_max, total).await;
    info!(?report, "Finished fetching new items");
    Ok(report)
  }

  /// Re-fetch every archived story to pick up score and comment changes.
  pub async fn refresh_all_stories(&self) -> Result<SyncReport> {
    let limit = self.config.test_mode.then_some(TEST_MODE_STORY_LIMIT);
    let ids = self
      .store
      .story_ids(limit)
      .await
      .map_err(|e| Error::StoreRead(Box::new(e)))?;

    info!(count = ids.len(), "Refreshing stories");
    let total = ids.len();
    let report = self.process_all(ids, total).await;
    info!(?report, "Finished refreshing stories");
    Ok(report)
  }

  /// Re-fetch only the stories last synced before `cutoff`.
  pub async fn refresh_stale_stories(
    &self,
    cutoff: DateTime<Utc>,
  ) -> Result<SyncReport> {
    let mut ids = self
      .store
      .stories_synced_before(cutoff)
      .await
      .map_err(|e| Error::StoreRead(Box::new(e)))?;

    if self.config.test_mode {
      ids.truncate(TEST_MODE_STORY_LIMIT);
    }

    info!(count = ids.len(), %cutoff, "Refreshing stale stories");
    let total = ids.len();
    let report = self.process_all(ids, total).await;
    info!(?report, "Finished refreshing stale stories");
    Ok(report)
  }

  async fn process_all(
    &self,
    ids: impl IntoIterator<Item = ItemId>,
    total: usize,
  ) -> SyncReport {
    let mut report = SyncReport::default();
    let mut progress = Progress::new(total, PROGRESS_INTERVAL);
    for id in ids {
      let result = self.process(id).await;
      if let Err(e) = &result {
        warn!(item_id = id, error = %e, "Failed to archive item, continuing");
      }
      report.record(&result);
      if progress.tick() {
        info!(
          done = progress.done,
          total = progress.total,
          failed = report.failed,
          "Progress"
        );
      }
    }
    report
  }

  /// Fetch one item, classify it, and upsert it or skip it.
  pub async fn process(&self, id: ItemId) -> Result<Outcome> {
    debug!(item_id = id, "Fetching item");

    let item = self
      .source
      .get_item(id)
      .await
      .map_err(|e| Error::RemoteFetch { id, source: Box::new(e) })?;

    let Some(item) = item else {
      debug!(item_id = id, "Item not found, skipping");
      return Ok(Outcome::NotFound);
    };

    if item.is_flagged() {
      info!(item_id = id, "Skipping item flagged as deleted or dead");
      return Ok(Outcome::SkippedFlagged);
    }

    let store_err = |e: S::Error| Error::StoreWrite { id, source: Box::new(e) };

    match item.kind {
      ItemKind::Story => {
        let story = StoryRecord::from_item(item, Utc::now())?;
        debug!(item_id = id, "Upserting story");
        self.store.upsert_story(story).await.map_err(store_err)?;
        Ok(Outcome::StoredStory)
      }
      ItemKind::Comment if self.config.skip_comments => Ok(Outcome::SkippedComment),
      ItemKind::Comment => {
        let comment = CommentRecord::from_item(item, Utc::now())?;
        debug!(item_id = id, "Upserting comment");
        self.store.upsert_comment(comment).await.map_err(store_err)?;
        Ok(Outcome::StoredComment)
      }
      other => {
        debug!(item_id = id, kind = %other, "Skipping unsupported item type");
        Ok(Outcome::SkippedOther(other))
      }
    }
  }
}
