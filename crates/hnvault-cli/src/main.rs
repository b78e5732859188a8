//! `hnvault` — incrementally archive Hacker News items into SQLite.
//!
//! # Usage
//!
//! ```
//! hnvault --first-run               # seed from the last 1000 items
//! hnvault                           # fetch everything after the stored cursor
//! hnvault --skip-comments           # archive stories only
//! hnvault --update-stories          # re-fetch stored stories for new scores
//! ```

mod client;
mod settings;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use hnvault_core::{Crawler, CrawlerConfig, SyncReport, store::ArchiveStore};
use hnvault_store_sqlite::SqliteStore;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use client::HnClient;
use settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "hnvault", version, about = "Archive Hacker News items into SQLite")]
struct Cli {
  /// Start from the 1000 most recent items instead of the stored cursor.
  #[arg(long)]
  first_run: bool,

  /// Do not store comments.
  #[arg(long)]
  skip_comments: bool,

  /// Re-fetch already archived stories instead of fetching new items.
  #[arg(long, conflicts_with = "first_run")]
  update_stories: bool,

  /// With --update-stories, only re-fetch stories last synced this many
  /// hours ago or earlier.
  #[arg(long, value_name = "HOURS", requires = "update_stories")]
  stale_after_hours: Option<u32>,

  /// Path to a TOML config file (db_path, api_url, request_timeout_secs).
  #[arg(short, long, value_name = "FILE", default_value = "hnvault.toml")]
  config: PathBuf,

  /// SQLite archive file; overrides the config file.
  #[arg(long, value_name = "PATH")]
  db: Option<PathBuf>,

  /// Base URL of the item API; overrides the config file.
  #[arg(long, value_name = "URL")]
  api_url: Option<String>,

  /// Append logs to this file instead of writing them to stderr.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.log_file.as_deref())?;

  let mut settings = Settings::load(&cli.config).context("failed to read settings")?;
  // CLI flags override config file, which overrides defaults.
  if let Some(db) = &cli.db {
    settings.db_path = db.clone();
  }
  if let Some(url) = &cli.api_url {
    settings.api_url = url.clone();
  }

  info!(?settings, "Running the crawler");

  let client = HnClient::new(settings.client_config()).context("failed to build HTTP client")?;
  let store = SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| format!("failed to open archive at {:?}", settings.db_path))?;

  // Close the store on every exit path, then report the run's own error first.
  let run_result = run(&cli, &client, &store).await;
  let close_result = store.close().await.context("failed to close archive");
  let report = run_result?;
  close_result?;

  if report.failed > 0 {
    warn!(failed = report.failed, "Some items could not be archived; see log for details");
  }
  Ok(())
}

async fn run(cli: &Cli, client: &HnClient, store: &SqliteStore) -> Result<SyncReport> {
  let config = CrawlerConfig {
    first_run:     cli.first_run,
    skip_comments: cli.skip_comments,
    test_mode:     false,
  };
  let crawler = Crawler::new(client, store, config);

  let report = if cli.update_stories {
    match cli.stale_after_hours {
      Some(hours) => {
        let cutoff = Utc::now() - Duration::hours(i64::from(hours));
        crawler.refresh_stale_stories(cutoff).await
      }
      None => crawler.refresh_all_stories().await,
    }
  } else {
    crawler.fetch_new_items().await
  }
  .context("crawl aborted")?;

  let counts = store.counts().await.context("failed to count archived rows")?;
  info!(
    stories = counts.stories,
    comments = counts.comments,
    "Archive totals"
  );

  Ok(report)
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// `RUST_LOG` overrides the default `info` level.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
      subscriber.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    None => subscriber.with_writer(io::stderr).init(),
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn update_stories_conflicts_with_first_run() {
    let err = Cli::try_parse_from(["hnvault", "--first-run", "--update-stories"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
  }

  #[test]
  fn stale_window_requires_update_mode() {
    assert!(Cli::try_parse_from(["hnvault", "--stale-after-hours", "6"]).is_err());

    let cli =
      Cli::try_parse_from(["hnvault", "--update-stories", "--stale-after-hours", "6"]).unwrap();
    assert_eq!(cli.stale_after_hours, Some(6));
    assert!(!cli.skip_comments);
  }

  #[test]
  fn defaults() {
    let cli = Cli::try_parse_from(["hnvault"]).unwrap();
    assert!(!cli.first_run && !cli.update_stories);
    assert_eq!(cli.config, PathBuf::from("hnvault.toml"));
    assert!(cli.db.is_none());
  }
}
