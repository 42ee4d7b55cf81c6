//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `listing` - Listing view: mount effect and tree composition
//! - `render` - Frame layout dispatch
//! - `grid` - Grouped grid widget
//! - `status` - Status bar widget
//! - `plain` - Text output for `--list`
//! - `helpers` - Background task spawning

mod events;
mod grid;
pub(crate) mod helpers;
mod input;
pub mod listing;
mod loop_runner;
mod plain;
mod render;
mod status;

// Re-export the public API
pub use events::handle_app_event;
pub use loop_runner::{run, Action};
pub use plain::render_plain;
