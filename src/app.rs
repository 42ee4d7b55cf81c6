use crate::config::Config;
use crate::feed::{Feed, HealthMonitor, HealthReport, RetrieveError};
use crate::listing::{feed_groups, FeedCatalog, FetchOrchestrator};
use crate::theme::{ColorPalette, ThemeVariant};
use crate::ui::helpers::{spawn_feed_fetch, spawn_health_check};
use crate::ui::listing::{ListingProps, ListingView};
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a transient status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Results delivered from background tasks to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Outcome of the retrieval started by a listing mount.
    FeedsRetrieved(Result<Vec<Feed>, RetrieveError>),
    /// Health report for the feeds that were current when the check started.
    ///
    /// `generation` is the [`App::load_generation`] the check was started for.
    HealthChecked {
        generation: u64,
        report: HealthReport,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "health_check")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// Application state.
///
/// The single owner of the feed catalog. Everything that mutates it runs on
/// the event loop; background tasks only ever send [`AppEvent`]s back.
pub struct App {
    // Listing core
    pub catalog: FeedCatalog,
    pub orchestrator: FetchOrchestrator,
    pub listing: ListingView,

    // Health
    pub health_monitor: Arc<dyn HealthMonitor>,
    pub health: HealthReport,
    /// A health check is running; avoids stacking checks on rapid toggling.
    pub health_pending: bool,
    /// Bumped on every successful load. Health reports tagged with an older
    /// value describe a replaced feed list.
    pub load_generation: u64,

    // Display toggles, passed unchanged to every grid item
    pub enable_health: bool,
    pub compare_offchain: bool,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: ColorPalette,

    // UI State
    /// Index of the selected item in display order (groups, then feeds).
    pub selected: usize,
    /// First visible line of the grid.
    pub scroll_offset: usize,
    /// Columns in the last rendered grid, used for vertical movement.
    pub grid_columns: usize,
    pub spinner_frame: usize,

    /// Transient message with the time it was set.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Last retrieval failure, shown until the next load succeeds or the
    /// listing is remounted.
    pub fetch_error: Option<String>,
    pub last_loaded: Option<DateTime<Local>>,

    /// Only render when state has changed.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        config: &Config,
        orchestrator: FetchOrchestrator,
        health_monitor: Arc<dyn HealthMonitor>,
    ) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, falling back to dark");
            ThemeVariant::Dark
        });

        Self {
            catalog: FeedCatalog::new(),
            orchestrator,
            listing: ListingView::new(),
            health_monitor,
            health: HealthReport::new(),
            health_pending: false,
            load_generation: 0,
            enable_health: config.enable_health,
            compare_offchain: config.compare_offchain,
            theme_variant,
            theme: theme_variant.palette(),
            selected: 0,
            scroll_offset: 0,
            grid_columns: 1,
            spinner_frame: 0,
            status_message: None,
            fetch_error: None,
            last_loaded: None,
            needs_redraw: true,
        }
    }

    /// Run the listing's mount effect.
    ///
    /// Called before every draw; only the first call of a mount starts a
    /// fetch. Returns whether a fetch was started.
    pub fn mount_listing(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> bool {
        let Self {
            listing,
            orchestrator,
            catalog,
            ..
        } = self;

        let mut started = false;
        listing.mount(|| {
            if let Some(pending) = orchestrator.begin(catalog) {
                spawn_feed_fetch(pending, event_tx.clone());
                started = true;
            }
        });
        if started {
            self.needs_redraw = true;
        }
        started
    }

    /// End the current listing mount so the next draw mounts it afresh.
    pub fn remount_listing(&mut self) {
        self.listing.unmount();
        self.fetch_error = None;
        self.needs_redraw = true;
    }

    pub fn listing_props(&self) -> ListingProps<'_> {
        ListingProps {
            loading_feeds: self.catalog.is_loading(),
            feed_groups: feed_groups(&self.catalog),
            enable_health: self.enable_health,
            compare_offchain: self.compare_offchain,
        }
    }

    /// Number of selectable grid items.
    pub fn item_count(&self) -> usize {
        if self.catalog.is_loading() {
            0
        } else {
            self.catalog.current_feeds().len()
        }
    }

    pub fn selected_feed(&self) -> Option<&Feed> {
        if self.catalog.is_loading() {
            return None;
        }
        feed_groups(&self.catalog)
            .into_iter()
            .flat_map(|g| g.feeds)
            .nth(self.selected)
    }

    /// Move the selection by `delta` items, clamped to the grid.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let max = count - 1;
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize).min(max)
        };
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.item_count().saturating_sub(1);
    }

    /// Keep the selection inside the grid after the feed list changes.
    pub fn clamp_selection(&mut self) {
        let count = self.item_count();
        if count == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    /// Flip health display. Turning it on with feeds present starts a check.
    pub fn toggle_health(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.enable_health = !self.enable_health;
        tracing::debug!(enable_health = self.enable_health, "Toggled health display");
        if self.enable_health {
            self.request_health_check(event_tx);
            self.set_status("Health display on");
        } else {
            self.set_status("Health display off");
        }
    }

    pub fn toggle_compare_offchain(&mut self) {
        self.compare_offchain = !self.compare_offchain;
        tracing::debug!(
            compare_offchain = self.compare_offchain,
            "Toggled off-chain comparison"
        );
        self.set_status(if self.compare_offchain {
            "Off-chain comparison on"
        } else {
            "Off-chain comparison off"
        });
    }

    /// Start a health check of the current feeds, unless one is running or
    /// there is nothing to check.
    pub fn request_health_check(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if self.health_pending || self.catalog.current_feeds().is_empty() {
            return;
        }
        self.health_pending = true;
        spawn_health_check(
            Arc::clone(&self.health_monitor),
            self.catalog.shared_feeds(),
            self.load_generation,
            event_tx.clone(),
        );
    }

    pub fn cycle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.theme = self.theme_variant.palette();
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it has expired.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
