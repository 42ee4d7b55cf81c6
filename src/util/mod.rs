//! Text helpers for terminal rendering of remote feed data.

mod text;

pub use text::{display_width, short_address, strip_control_chars, truncate_to_width};
