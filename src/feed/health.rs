//! Feed health capability.
//!
//! Health reporting is gated by the `enable_health` toggle. No live source
//! exists yet, so the only implementation reports nothing and every feed
//! renders as [`HealthStatus::Unknown`]. A real monitor plugs in through
//! [`monitor_for`] without touching the listing view.

use crate::config::Config;
use crate::feed::types::Feed;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Health of a single feed as shown on its grid item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    #[default]
    Unknown,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unknown => "unknown",
        }
    }
}

/// Feed name -> reported status. Feeds missing from the map are `Unknown`.
pub type HealthReport = HashMap<String, HealthStatus>;

#[async_trait]
pub trait HealthMonitor: Send + Sync {
    /// Check the given feeds. Never fails: an unreachable source reports nothing.
    async fn check(&self, feeds: &[Feed]) -> HealthReport;

    fn name(&self) -> &'static str;
}

/// Reports no health data.
#[derive(Debug, Default)]
pub struct NoopHealthMonitor;

#[async_trait]
impl HealthMonitor for NoopHealthMonitor {
    async fn check(&self, _feeds: &[Feed]) -> HealthReport {
        HealthReport::new()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Select the health monitor for this configuration.
pub fn monitor_for(config: &Config) -> Arc<dyn HealthMonitor> {
    if config.enable_health {
        tracing::info!("Health display enabled but no health source is available, reporting unknown");
    }
    Arc::new(NoopHealthMonitor)
}

/// Status for one feed, defaulting to `Unknown`.
pub fn status_of(report: &HealthReport, feed: &Feed) -> HealthStatus {
    report.get(&feed.name).copied().unwrap_or_default()
}
