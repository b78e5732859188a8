//! Error types for `hnvault-core`.

use thiserror::Error;

use crate::item::ItemId;

/// Boxed error from a collaborator (item source or archive store).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to fetch the remote max item id: {0}")]
  MaxItemId(#[source] BoxError),

  #[error("failed to fetch item {id}: {source}")]
  RemoteFetch {
    id:     ItemId,
    #[source]
    source: BoxError,
  },

  #[error("store read failed: {0}")]
  StoreRead(#[source] BoxError),

  #[error("failed to store item {id}: {source}")]
  StoreWrite {
    id:     ItemId,
    #[source]
    source: BoxError,
  },

  #[error("item {id} is missing required field `{field}`")]
  MalformedItem { id: ItemId, field: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
