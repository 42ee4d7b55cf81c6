//! Price feed records and the collaborators that supply them.
//!
//! - [`types`] - the [`Feed`] record as published in the feed list
//! - [`retriever`] - HTTP and file retrieval behind the [`FeedRetriever`] trait
//! - [`health`] - the health capability gated by the `enable_health` toggle

pub mod health;
pub mod retriever;
mod types;

pub use health::{HealthMonitor, HealthReport, HealthStatus, NoopHealthMonitor};
pub use retriever::{
    parse_feed_list, retriever_for, FeedRetriever, FileFeedRetriever, HttpFeedRetriever,
    RetrieveError,
};
pub use types::Feed;
