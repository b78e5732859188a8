//! The `ItemSource` trait — read access to the remote item API.
//!
//! Implemented by the HTTP client in `hnvault-cli`; tests substitute an
//! in-memory map.

use std::future::Future;

use crate::item::{Item, ItemId};

pub trait ItemSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one item. `Ok(None)` means the remote has no item under `id`;
  /// errors are reserved for transport and protocol failures.
  fn get_item(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// The largest item id the remote has assigned so far.
  fn get_max_item_id(
    &self,
  ) -> impl Future<Output = Result<ItemId, Self::Error>> + Send + '_;
}
