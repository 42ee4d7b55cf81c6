//! Background task helpers.
//!
//! Every task reports back to the event loop through an [`AppEvent`]; none of
//! them touch application state directly.

use crate::app::AppEvent;
use crate::feed::{Feed, HealthMonitor, RetrieveError};
use crate::listing::PendingFetch;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Returns `Ok(result)` if the future completes normally, or
/// `Err(panic_message)` if it panics.
pub(crate) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Run a pending feed retrieval in the background.
///
/// Always answers with [`AppEvent::FeedsRetrieved`], even if the retrieval
/// panics, so the catalog never stays in the loading state.
pub(crate) fn spawn_feed_fetch(pending: PendingFetch, event_tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = match catch_task_panic(pending.run()).await {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Feed fetch task panicked");
                Err(RetrieveError::TaskFailed(panic_msg))
            }
        };

        if let Err(e) = event_tx.send(AppEvent::FeedsRetrieved(result)).await {
            tracing::warn!(error = %e, "Failed to deliver feed list (receiver dropped)");
        }
    });
}

/// Run a health check of `feeds` in the background. The report is tagged
/// with `generation` so the loop can drop it if the list was replaced.
pub(crate) fn spawn_health_check(
    monitor: Arc<dyn HealthMonitor>,
    feeds: Arc<Vec<Feed>>,
    generation: u64,
    event_tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        tracing::debug!(monitor = monitor.name(), feeds = feeds.len(), "Checking feed health");
        let event = match catch_task_panic(monitor.check(&feeds)).await {
            Ok(report) => AppEvent::HealthChecked { generation, report },
            Err(panic_msg) => AppEvent::TaskPanicked {
                task: "health_check",
                error: panic_msg,
            },
        };

        if let Err(e) = event_tx.send(event).await {
            tracing::warn!(error = %e, "Failed to deliver health report (receiver dropped)");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::NoopHealthMonitor;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_captures_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_health_check_reports_back() {
        let (tx, mut rx) = mpsc::channel(1);
        spawn_health_check(
            Arc::new(NoopHealthMonitor),
            Arc::new(vec![Feed::new("ETH / USD", "USD")]),
            3,
            tx,
        );
        match rx.recv().await {
            Some(AppEvent::HealthChecked { generation, report }) => {
                assert_eq!(generation, 3);
                assert!(report.is_empty());
            }
            other => panic!("Expected HealthChecked, got {:?}", other),
        }
    }
}
