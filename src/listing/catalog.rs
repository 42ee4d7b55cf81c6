use crate::feed::{Feed, RetrieveError};
use std::sync::Arc;

/// Authoritative in-memory list of feeds plus the loading flag.
///
/// Owned by [`crate::app::App`] and mutated only by
/// [`super::FetchOrchestrator`] through `begin_load` / `complete_load`.
/// `loading` is true strictly between those two calls.
#[derive(Debug, Default)]
pub struct FeedCatalog {
    loading: bool,
    /// Arc for O(1) hand-off to background tasks. Replaced wholesale on load.
    feeds: Arc<Vec<Feed>>,
}

impl FeedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_feeds(&self) -> &[Feed] {
        &self.feeds
    }

    /// Cheap clone of the current feed list.
    pub fn shared_feeds(&self) -> Arc<Vec<Feed>> {
        Arc::clone(&self.feeds)
    }

    pub(super) fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a retrieval outcome.
    ///
    /// Success replaces the feed list; failure keeps whatever was known
    /// before. Either way loading ends. The error is handed back to the
    /// caller rather than stored.
    pub(super) fn complete_load(
        &mut self,
        result: Result<Vec<Feed>, RetrieveError>,
    ) -> Result<usize, RetrieveError> {
        self.loading = false;
        let feeds = result?;
        let count = feeds.len();
        self.feeds = Arc::new(feeds);
        Ok(count)
    }
}
