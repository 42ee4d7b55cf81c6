use crate::feed::{Feed, FeedRetriever, RetrieveError};
use crate::listing::FeedCatalog;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// A fetch for this catalog has begun and not yet completed.
    #[error("A feed fetch is already in progress")]
    AlreadyInFlight,
    #[error(transparent)]
    Retrieve(#[from] RetrieveError),
}

/// Drives the catalog through a load: begin, retrieve, complete.
///
/// The retrieval itself is delegated to the injected [`FeedRetriever`].
/// There is no automatic retry; a failed load leaves the catalog idle with
/// its previous feeds.
#[derive(Clone)]
pub struct FetchOrchestrator {
    retriever: Arc<dyn FeedRetriever>,
}

impl FetchOrchestrator {
    pub fn new(retriever: Arc<dyn FeedRetriever>) -> Self {
        Self { retriever }
    }

    pub fn source(&self) -> &str {
        self.retriever.source()
    }

    /// Load feeds into the catalog, awaiting the retrieval inline.
    pub async fn fetch_feeds(&self, catalog: &mut FeedCatalog) -> Result<(), FetchError> {
        let pending = self.begin(catalog).ok_or(FetchError::AlreadyInFlight)?;
        let result = pending.run().await;
        Self::complete(catalog, result)?;
        Ok(())
    }

    /// Start a load without awaiting it.
    ///
    /// Marks the catalog as loading and returns the retrieval to run
    /// elsewhere (typically a spawned task). Returns `None` if a load is
    /// already in flight; overlapping loads are never started.
    pub fn begin(&self, catalog: &mut FeedCatalog) -> Option<PendingFetch> {
        if catalog.is_loading() {
            tracing::debug!(source = %self.source(), "Fetch already in flight, not starting another");
            return None;
        }
        catalog.begin_load();
        tracing::info!(source = %self.source(), "Fetching feed list");
        Some(PendingFetch {
            retriever: Arc::clone(&self.retriever),
        })
    }

    /// Finish a load started with [`Self::begin`].
    ///
    /// Returns the number of feeds now in the catalog, or the retrieval error.
    pub fn complete(
        catalog: &mut FeedCatalog,
        result: Result<Vec<Feed>, RetrieveError>,
    ) -> Result<usize, RetrieveError> {
        match catalog.complete_load(result) {
            Ok(count) => {
                tracing::info!(count, "Feed list loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept = catalog.current_feeds().len(),
                    "Feed list retrieval failed, keeping previous feeds"
                );
                Err(e)
            }
        }
    }
}

/// The retrieval half of a load, detached from the catalog.
pub struct PendingFetch {
    retriever: Arc<dyn FeedRetriever>,
}

impl PendingFetch {
    pub async fn run(self) -> Result<Vec<Feed>, RetrieveError> {
        self.retriever.retrieve_feed_list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Hands out queued outcomes and counts calls.
    struct ScriptedRetriever {
        outcomes: Mutex<Vec<Result<Vec<Feed>, RetrieveError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedRetriever {
        fn new(mut outcomes: Vec<Result<Vec<Feed>, RetrieveError>>) -> Arc<Self> {
            outcomes.reverse();
            Arc::new(Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FeedRetriever for ScriptedRetriever {
        async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn source(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_fetch_feeds_success() {
        let retriever = ScriptedRetriever::new(vec![Ok(vec![
            Feed::new("ETH / USD", "USD"),
            Feed::new("BTC / USD", "USD"),
        ])]);
        let orchestrator = FetchOrchestrator::new(retriever.clone());
        let mut catalog = FeedCatalog::new();

        orchestrator.fetch_feeds(&mut catalog).await.unwrap();

        assert!(!catalog.is_loading());
        assert_eq!(catalog.current_feeds().len(), 2);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_feeds_failure_keeps_feeds() {
        let retriever = ScriptedRetriever::new(vec![
            Ok(vec![Feed::new("ETH / USD", "USD")]),
            Err(RetrieveError::HttpStatus(502)),
        ]);
        let orchestrator = FetchOrchestrator::new(retriever);
        let mut catalog = FeedCatalog::new();

        orchestrator.fetch_feeds(&mut catalog).await.unwrap();
        let err = orchestrator.fetch_feeds(&mut catalog).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Retrieve(RetrieveError::HttpStatus(502))
        ));
        assert!(!catalog.is_loading());
        assert_eq!(catalog.current_feeds()[0].name, "ETH / USD");
    }

    #[tokio::test]
    async fn test_begin_guards_overlapping_fetch() {
        let retriever = ScriptedRetriever::new(vec![Ok(vec![Feed::new("ETH / USD", "USD")])]);
        let orchestrator = FetchOrchestrator::new(retriever.clone());
        let mut catalog = FeedCatalog::new();

        let pending = orchestrator.begin(&mut catalog).unwrap();
        assert!(catalog.is_loading());
        assert!(orchestrator.begin(&mut catalog).is_none());
        assert!(matches!(
            orchestrator.fetch_feeds(&mut catalog).await,
            Err(FetchError::AlreadyInFlight)
        ));
        assert!(catalog.is_loading());

        let result = pending.run().await;
        FetchOrchestrator::complete(&mut catalog, result).unwrap();

        assert!(!catalog.is_loading());
        assert_eq!(catalog.current_feeds().len(), 1);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_begin_allowed_again_after_complete() {
        let retriever = ScriptedRetriever::new(vec![Err(RetrieveError::Timeout(30)), Ok(vec![])]);
        let orchestrator = FetchOrchestrator::new(retriever);
        let mut catalog = FeedCatalog::new();

        let pending = orchestrator.begin(&mut catalog).unwrap();
        let result = pending.run().await;
        assert!(FetchOrchestrator::complete(&mut catalog, result).is_err());

        assert!(orchestrator.begin(&mut catalog).is_some());
    }
}
