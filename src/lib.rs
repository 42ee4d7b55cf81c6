//! Terminal browser for decentralized price reference feeds.
//!
//! The feed list is retrieved once per listing mount, stored in a
//! [`listing::FeedCatalog`], partitioned into category groups and shown as a
//! grid of items, one captioned section per group.

pub mod app;
pub mod config;
pub mod feed;
pub mod listing;
pub mod theme;
pub mod ui;
pub mod util;
