//! Error type for `hnvault-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("item id {0} does not fit in an SQLite integer")]
  IdOutOfRange(u64),

  #[error("negative item id in database: {0}")]
  NegativeId(i64),

  #[error("negative row count in database: {0}")]
  NegativeCount(i64),

  #[error("timestamp out of range: {0}")]
  TimestampOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
