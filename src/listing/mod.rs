//! Listing core: the feed catalog, the fetch that fills it, and the grouping
//! that projects it for display.
//!
//! - [`catalog`] - [`FeedCatalog`], the single-writer store
//! - [`orchestrator`] - [`FetchOrchestrator`], the only thing that mutates it
//! - [`groups`] - [`feed_groups`], a pure projection into [`ListingGroup`]s

mod catalog;
mod groups;
mod orchestrator;

pub use catalog::FeedCatalog;
pub use groups::{feed_groups, group_feeds, ListingGroup};
pub use orchestrator::{FetchError, FetchOrchestrator, PendingFetch};
