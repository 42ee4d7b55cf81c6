//! Application event handling.
//!
//! Applies background task results to application state. This is where the
//! fetch started by a listing mount is completed, always on the event loop.

use crate::app::{App, AppEvent};
use crate::feed::{Feed, HealthReport, RetrieveError};
use crate::listing::FetchOrchestrator;
use chrono::Local;
use tokio::sync::mpsc;

/// Handle one event from a background task.
pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::FeedsRetrieved(result) => handle_feeds_retrieved(app, result, event_tx),
        AppEvent::HealthChecked { generation, report } => {
            handle_health_checked(app, generation, report, event_tx)
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == "health_check" {
                app.health_pending = false;
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

fn handle_feeds_retrieved(
    app: &mut App,
    result: Result<Vec<Feed>, RetrieveError>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match FetchOrchestrator::complete(&mut app.catalog, result) {
        Ok(count) => {
            app.load_generation += 1;
            app.fetch_error = None;
            app.last_loaded = Some(Local::now());
            // Entries for feeds that no longer exist are dropped with the old list.
            app.health.clear();
            app.clamp_selection();
            app.set_status(format!("Loaded {} feeds", count));
            // A check still running for the previous list is re-run for this
            // one when its stale report arrives.
            if app.enable_health {
                app.request_health_check(event_tx);
            }
        }
        Err(e) => {
            app.clamp_selection();
            app.fetch_error = Some(e.to_string());
        }
    }
}

fn handle_health_checked(
    app: &mut App,
    generation: u64,
    report: HealthReport,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    app.health_pending = false;
    if generation != app.load_generation {
        tracing::debug!(
            generation,
            current = app.load_generation,
            "Dropping health report for a replaced feed list"
        );
        if app.enable_health {
            app.request_health_check(event_tx);
        }
        return;
    }
    tracing::debug!(reported = report.len(), "Health report received");
    app.health = report;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::{FeedRetriever, HealthMonitor, HealthStatus, NoopHealthMonitor};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Reports every feed it is asked about as healthy.
    struct MarkingMonitor;

    #[async_trait]
    impl HealthMonitor for MarkingMonitor {
        async fn check(&self, feeds: &[Feed]) -> HealthReport {
            feeds
                .iter()
                .map(|f| (f.name.clone(), HealthStatus::Healthy))
                .collect()
        }

        fn name(&self) -> &'static str {
            "marking"
        }
    }

    struct StaticRetriever;

    #[async_trait]
    impl FeedRetriever for StaticRetriever {
        async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError> {
            Ok(vec![
                Feed::new("ETH / USD", "USD"),
                Feed::new("BTC / USD", "USD"),
            ])
        }

        fn source(&self) -> &str {
            "static"
        }
    }

    fn test_app(enable_health: bool) -> App {
        let config = Config {
            enable_health,
            ..Config::default()
        };
        App::new(
            &config,
            FetchOrchestrator::new(Arc::new(StaticRetriever)),
            Arc::new(NoopHealthMonitor),
        )
    }

    #[tokio::test]
    async fn test_retrieved_feeds_complete_the_load() {
        let mut app = test_app(false);
        let (tx, mut rx) = mpsc::channel(8);

        app.mount_listing(&tx);
        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event, &tx);

        assert!(!app.catalog.is_loading());
        assert_eq!(app.catalog.current_feeds().len(), 2);
        assert!(app.last_loaded.is_some());
        assert!(app.fetch_error.is_none());
    }

    #[tokio::test]
    async fn test_failure_records_error_and_keeps_feeds() {
        let mut app = test_app(false);
        let (tx, mut rx) = mpsc::channel(8);
        app.mount_listing(&tx);
        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event, &tx);
        app.selected = 1;

        app.remount_listing();
        app.mount_listing(&tx);
        let _ = rx.recv().await.unwrap();
        handle_app_event(
            &mut app,
            AppEvent::FeedsRetrieved(Err(RetrieveError::HttpStatus(503))),
            &tx,
        );

        assert!(!app.catalog.is_loading());
        assert_eq!(app.catalog.current_feeds().len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.fetch_error.as_deref(), Some("HTTP error: status 503"));
    }

    #[tokio::test]
    async fn test_load_with_health_enabled_requests_check() {
        let mut app = test_app(true);
        let (tx, mut rx) = mpsc::channel(8);

        app.mount_listing(&tx);
        let event = rx.recv().await.unwrap();
        handle_app_event(&mut app, event, &tx);
        assert!(app.health_pending);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::HealthChecked { generation: 1, .. }));
        handle_app_event(&mut app, event, &tx);
        assert!(!app.health_pending);
        let feed = &app.catalog.current_feeds()[0];
        assert_eq!(
            crate::feed::health::status_of(&app.health, feed),
            HealthStatus::Unknown
        );
    }

    fn load(app: &mut App, feeds: Vec<Feed>, tx: &mpsc::Sender<AppEvent>) {
        let pending = app.orchestrator.begin(&mut app.catalog);
        assert!(pending.is_some());
        handle_app_event(app, AppEvent::FeedsRetrieved(Ok(feeds)), tx);
    }

    #[tokio::test]
    async fn test_reload_during_health_check_rechecks_new_list() {
        let mut app = App::new(
            &Config {
                enable_health: true,
                ..Config::default()
            },
            FetchOrchestrator::new(Arc::new(StaticRetriever)),
            Arc::new(MarkingMonitor),
        );
        let (tx, mut rx) = mpsc::channel(8);

        load(&mut app, vec![Feed::new("OLD", "USD")], &tx);
        assert!(app.health_pending);
        // The second list lands before the first check is handled.
        load(&mut app, vec![Feed::new("NEW", "USD")], &tx);

        // Stale report for the first list is dropped and a new check starts.
        let stale = rx.recv().await.unwrap();
        assert!(matches!(stale, AppEvent::HealthChecked { generation: 1, .. }));
        handle_app_event(&mut app, stale, &tx);
        assert!(app.health.is_empty());
        assert!(app.health_pending);

        let fresh = rx.recv().await.unwrap();
        assert!(matches!(fresh, AppEvent::HealthChecked { generation: 2, .. }));
        handle_app_event(&mut app, fresh, &tx);

        assert!(!app.health_pending);
        let mut keys: Vec<_> = app.health.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["NEW".to_string()]);
    }

    #[tokio::test]
    async fn test_stale_report_dropped_when_health_turned_off() {
        let mut app = App::new(
            &Config {
                enable_health: true,
                ..Config::default()
            },
            FetchOrchestrator::new(Arc::new(StaticRetriever)),
            Arc::new(MarkingMonitor),
        );
        let (tx, mut rx) = mpsc::channel(8);

        load(&mut app, vec![Feed::new("OLD", "USD")], &tx);
        app.enable_health = false;
        load(&mut app, vec![Feed::new("NEW", "USD")], &tx);

        let stale = rx.recv().await.unwrap();
        handle_app_event(&mut app, stale, &tx);
        assert!(!app.health_pending);
        assert!(app.health.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_health_panic_clears_pending() {
        let mut app = test_app(true);
        let (tx, _rx) = mpsc::channel(1);
        app.health_pending = true;
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "health_check",
                error: "boom".into(),
            },
            &tx,
        );
        assert!(!app.health_pending);
        assert!(app.status_message.is_some());
    }
}
