//! Plain-text rendering of the listing for non-interactive output.

use crate::feed::health::{status_of, HealthReport};
use crate::ui::listing::ListingTree;
use crate::util::{short_address, strip_control_chars};
use std::fmt::Write;

/// Render a composed listing as indented text, one section per caption.
pub fn render_plain(tree: &ListingTree<'_>, health: &HealthReport) -> String {
    let mut out = String::new();
    let sections = match tree {
        ListingTree::Loading => {
            out.push_str("Loading Feeds...\n");
            return out;
        }
        ListingTree::Loaded(sections) => sections,
    };

    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", strip_control_chars(&section.caption));
        for item in &section.items {
            let feed = item.feed;
            let _ = write!(out, "  {}", strip_control_chars(&feed.name));
            if let Some(address) = feed.contract_address.as_deref() {
                let _ = write!(out, "  {}", short_address(address));
            }
            if item.enable_health {
                let _ = write!(out, "  [{}]", status_of(health, feed).label());
            }
            if item.compare_offchain {
                if let Some(link) = feed.compare_offchain.as_deref() {
                    let _ = write!(out, "  {}", strip_control_chars(link));
                }
            }
            out.push('\n');
        }
    }
    out
}
