//! Item source abstraction layer.
//!
//! This module defines the [`ItemSource`] trait, the common [`FeedItem`]
//! record and the [`FetchError`] taxonomy.  Concrete sources live in
//! sub-modules (currently only [`http`]).
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `fixture.rs`).
//! 2. Define a struct and implement [`ItemSource`] for it.
//! 3. Add `mod fixture;` below and re-export your struct.
//! 4. Construct an instance in `main.rs` and hand it to the dispatcher.
//!
//! The loader, debounce and UI are all source-agnostic.

mod error;
mod feed_item;
mod http;

pub use error::FetchError;
pub use feed_item::{truncate, FeedItem, ItemId};
pub use http::HttpSource;

use async_trait::async_trait;

/// Trait that every paged item source must implement.
///
/// The dispatcher calls [`fetch_page()`](ItemSource::fetch_page) on a tokio
/// task, so implementations must be [`Send`] + [`Sync`].
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Human-readable label used in logs and status messages.
    fn name(&self) -> &str;

    /// Fetch one page of records.
    ///
    /// `page` is 1-based.  An empty vector means the collection is exhausted.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<FeedItem>, FetchError>;
}
