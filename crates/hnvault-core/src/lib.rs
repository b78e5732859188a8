//! Core types, trait definitions and the incremental crawler for hnvault.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! remote API and the archive database are reached only through the
//! [`source::ItemSource`] and [`store::ArchiveStore`] traits.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod crawler;
pub mod error;
pub mod item;
pub mod record;
pub mod source;
pub mod store;

pub use crawler::{Crawler, CrawlerConfig, Outcome, SyncReport};
pub use error::{BoxError, Error, Result};
pub use item::{Item, ItemId, ItemKind};
