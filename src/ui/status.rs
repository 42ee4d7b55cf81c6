use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const HINTS: &str = "[r]eload [H]ealth [c]ompare [t]heme [q]uit";

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, is_error) = status_text(app);
    let style = if is_error {
        app.theme.status_error
    } else {
        app.theme.status_bar
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Text for the status bar and whether it reports a failure.
///
/// A transient message wins over a retrieval error, which wins over the
/// idle summary.
pub(super) fn status_text(app: &App) -> (Cow<'_, str>, bool) {
    if let Some((msg, _)) = &app.status_message {
        return (Cow::Borrowed(msg.as_ref()), false);
    }
    if let Some(err) = &app.fetch_error {
        return (
            Cow::Owned(format!("Failed to load feeds: {} - press r to retry", err)),
            true,
        );
    }
    if app.catalog.is_loading() {
        return (
            Cow::Owned(format!("Loading feeds from {}", app.orchestrator.source())),
            false,
        );
    }

    let count = app.catalog.current_feeds().len();
    let mut text = match app.last_loaded {
        Some(at) => format!("{} feeds, loaded {} | {}", count, at.format("%H:%M:%S"), HINTS),
        None => HINTS.to_string(),
    };
    if let Some(feed) = app.selected_feed() {
        let mut detail = strip_control_chars(&feed.name).into_owned();
        if let Some(network) = feed.network_id {
            detail.push_str(&format!(" (network {})", network));
        }
        if let Some(places) = feed.decimal_places {
            detail.push_str(&format!(", {} decimals", places));
        }
        text = format!("{} | {}", detail, text);
    }
    (Cow::Owned(text), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::{Feed, FeedRetriever, NoopHealthMonitor, RetrieveError};
    use crate::listing::FetchOrchestrator;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NamedRetriever;

    #[async_trait]
    impl FeedRetriever for NamedRetriever {
        async fn retrieve_feed_list(&self) -> Result<Vec<Feed>, RetrieveError> {
            Ok(Vec::new())
        }

        fn source(&self) -> &str {
            "feeds.json"
        }
    }

    fn test_app() -> App {
        App::new(
            &Config::default(),
            FetchOrchestrator::new(Arc::new(NamedRetriever)),
            Arc::new(NoopHealthMonitor),
        )
    }

    #[test]
    fn test_idle_shows_hints() {
        let app = test_app();
        let (text, is_error) = status_text(&app);
        assert_eq!(text, HINTS);
        assert!(!is_error);
    }

    #[test]
    fn test_fetch_error_is_reported() {
        let mut app = test_app();
        app.fetch_error = Some("HTTP error: status 502".into());
        let (text, is_error) = status_text(&app);
        assert_eq!(
            text,
            "Failed to load feeds: HTTP error: status 502 - press r to retry"
        );
        assert!(is_error);
    }

    #[test]
    fn test_status_message_takes_priority() {
        let mut app = test_app();
        app.fetch_error = Some("boom".into());
        app.set_status("Theme: light");
        let (text, is_error) = status_text(&app);
        assert_eq!(text, "Theme: light");
        assert!(!is_error);
    }

    #[test]
    fn test_idle_shows_selected_feed() {
        let mut app = test_app();
        let _ = app.orchestrator.begin(&mut app.catalog);
        let mut eth = Feed::new("ETH / USD", "USD");
        eth.network_id = Some(1);
        eth.decimal_places = Some(2);
        FetchOrchestrator::complete(
            &mut app.catalog,
            Ok(vec![Feed::new("EUR / USD", "Forex"), eth]),
        )
        .unwrap();
        app.selected = 1;

        let (text, is_error) = status_text(&app);
        assert_eq!(text, format!("ETH / USD (network 1), 2 decimals | {}", HINTS));
        assert!(!is_error);
    }

    #[test]
    fn test_loading_names_source() {
        let mut app = test_app();
        let _ = app.orchestrator.begin(&mut app.catalog);
        let (text, _) = status_text(&app);
        assert_eq!(text, "Loading feeds from feeds.json");
    }
}
