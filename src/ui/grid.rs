//! Grid rendering of a composed [`ListingTree`].
//!
//! Sections are laid out top to bottom as a caption line followed by rows of
//! fixed-size item cards. Layout is computed on an unscrolled virtual canvas
//! and then clipped to the viewport at the current scroll offset.

use crate::feed::health::{status_of, HealthReport};
use crate::theme::ColorPalette;
use crate::ui::listing::{GridItemProps, ListingTree};
use crate::util::{short_address, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Narrowest card before the grid drops a column.
pub(super) const MIN_ITEM_WIDTH: u16 = 30;

/// Fixed lines of card content (pair, contract, heartbeat).
const BASE_ITEM_LINES: u16 = 3;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Card height including borders. Uniform across the grid because every
/// item receives the same toggles.
pub(super) fn item_height(enable_health: bool, compare_offchain: bool) -> u16 {
    2 + BASE_ITEM_LINES + enable_health as u16 + compare_offchain as u16
}

pub(super) fn columns_for(width: u16) -> usize {
    (width / MIN_ITEM_WIDTH).max(1) as usize
}

/// One row of the virtual canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Row {
    Header { section: usize },
    /// Items `first..first + len` in display order.
    Items { section: usize, first: usize, len: usize },
    Spacer,
}

impl Row {
    fn height(self, item_h: u16) -> usize {
        match self {
            Self::Header { .. } | Self::Spacer => 1,
            Self::Items { .. } => item_h as usize,
        }
    }
}

/// Lay out sections into rows of at most `columns` items.
pub(super) fn virtual_rows(tree: &ListingTree<'_>, columns: usize) -> Vec<Row> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut index = 0;
    for (section, s) in tree.sections().iter().enumerate() {
        if section > 0 {
            rows.push(Row::Spacer);
        }
        rows.push(Row::Header { section });
        for chunk in s.items.chunks(columns) {
            rows.push(Row::Items {
                section,
                first: index,
                len: chunk.len(),
            });
            index += chunk.len();
        }
    }
    rows
}

/// Adjust `offset` so the line span `top..top + height` is fully visible in
/// a viewport of `viewport` lines.
pub(super) fn scroll_into_view(offset: usize, viewport: usize, top: usize, height: usize) -> usize {
    if top < offset {
        top
    } else if top + height > offset + viewport {
        (top + height).saturating_sub(viewport)
    } else {
        offset
    }
}

/// Draw the tree into `area`. Returns the scroll offset actually used.
#[allow(clippy::too_many_arguments)]
pub(super) fn render(
    f: &mut Frame,
    area: Rect,
    tree: &ListingTree<'_>,
    health: &HealthReport,
    palette: &ColorPalette,
    selected: usize,
    scroll_offset: usize,
    spinner_frame: usize,
) -> usize {
    if area.width < 1 || area.height < 1 {
        return scroll_offset;
    }

    let sections = match tree {
        ListingTree::Loading => {
            render_loading(f, area, palette, spinner_frame);
            return 0;
        }
        ListingTree::Loaded(sections) => sections,
    };

    if sections.is_empty() {
        let msg = Paragraph::new("No feeds loaded")
            .alignment(Alignment::Center)
            .style(palette.item_meta);
        f.render_widget(msg, centered_line(area));
        return 0;
    }

    let (enable_health, compare_offchain) = tree
        .items()
        .next()
        .map(|i| (i.enable_health, i.compare_offchain))
        .unwrap_or_default();
    let item_h = item_height(enable_health, compare_offchain);
    let columns = columns_for(area.width);
    let item_w = area.width / columns as u16;
    let rows = virtual_rows(tree, columns);
    let viewport = area.height as usize;

    // Keep the selected card on screen, with its caption when it sits in
    // the first row of a section.
    let mut offset = scroll_offset;
    let mut top = 0;
    let mut header_top = None;
    for row in &rows {
        match *row {
            Row::Header { .. } => header_top = Some(top),
            Row::Items { first, len, .. } => {
                if (first..first + len).contains(&selected) {
                    let span_top = header_top.unwrap_or(top);
                    let span = top + item_h as usize - span_top;
                    offset = scroll_into_view(offset, viewport, span_top, span);
                    break;
                }
                header_top = None;
            }
            Row::Spacer => {}
        }
        top += row.height(item_h);
    }

    let mut top = 0;
    for row in rows {
        let h = row.height(item_h);
        let visible = top >= offset && top + h <= offset + viewport;
        if visible {
            let y = area.y + (top - offset) as u16;
            match row {
                Row::Header { section } => {
                    let caption = strip_control_chars(&sections[section].caption);
                    let caption = truncate_to_width(&caption, area.width as usize).into_owned();
                    f.render_widget(
                        Paragraph::new(caption).style(palette.group_header),
                        Rect::new(area.x, y, area.width, 1),
                    );
                }
                Row::Items {
                    section,
                    first,
                    len,
                } => {
                    let base = first - section_start(&sections[..section]);
                    for col in 0..len {
                        let props = &sections[section].items[base + col];
                        let cell = Rect::new(area.x + col as u16 * item_w, y, item_w, item_h);
                        render_item(f, cell, props, health, palette, first + col == selected);
                    }
                }
                Row::Spacer => {}
            }
        }
        top += h;
        if top >= offset + viewport {
            break;
        }
    }

    offset
}

fn section_start(before: &[crate::ui::listing::Section<'_>]) -> usize {
    before.iter().map(|s| s.items.len()).sum()
}

fn render_loading(f: &mut Frame, area: Rect, palette: &ColorPalette, spinner_frame: usize) {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    let msg = Paragraph::new(format!("{} Loading Feeds...", spinner))
        .alignment(Alignment::Center)
        .style(palette.loading);
    f.render_widget(msg, centered_line(area));
}

fn centered_line(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, 1)
}

/// Draw one grid item card.
fn render_item(
    f: &mut Frame,
    cell: Rect,
    props: &GridItemProps<'_>,
    health: &HealthReport,
    palette: &ColorPalette,
    selected: bool,
) {
    if cell.width < 4 || cell.height < 3 {
        return;
    }
    let inner_w = cell.width.saturating_sub(2) as usize;
    let name = strip_control_chars(&props.feed.name);
    let title = truncate_to_width(&name, inner_w).into_owned();

    let border = if selected {
        palette.item_border_selected
    } else {
        palette.item_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, palette.item_title));

    let lines = item_lines(props, health, palette, inner_w);
    f.render_widget(Paragraph::new(lines).block(block), cell);
}

/// Content lines of a card, below the title.
pub(super) fn item_lines(
    props: &GridItemProps<'_>,
    health: &HealthReport,
    palette: &ColorPalette,
    width: usize,
) -> Vec<Line<'static>> {
    let feed = props.feed;
    let fit = |s: String| truncate_to_width(&strip_control_chars(&s), width).into_owned();

    let pair = feed.pair_label().unwrap_or_else(|| "-".to_string());
    let pair = match &feed.value_prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}  ({})", pair, prefix),
        _ => pair,
    };
    let contract = feed
        .contract_address
        .as_deref()
        .map(|a| short_address(a).into_owned())
        .unwrap_or_else(|| "no contract".to_string());
    let heartbeat = match feed.heartbeat {
        Some(secs) => format!("heartbeat {}", format_interval(secs)),
        None => "heartbeat -".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(fit(pair), palette.item_meta)),
        Line::from(Span::styled(fit(contract), palette.item_meta)),
        Line::from(Span::styled(fit(heartbeat), palette.item_meta)),
    ];

    if props.enable_health {
        let status = status_of(health, feed);
        lines.push(Line::from(Span::styled(
            fit(format!("● {}", status.label())),
            palette.health(status),
        )));
    }
    if props.compare_offchain {
        let target = feed
            .compare_offchain
            .as_deref()
            .and_then(|u| url::Url::parse(u).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "n/a".to_string());
        lines.push(Line::from(Span::styled(
            fit(format!("Compare ▸ {}", target)),
            palette.compare_link,
        )));
    }

    lines
}

/// Compact duration: `45s`, `30m`, `1h`, `1d`, `1h30m`.
pub(super) fn format_interval(secs: u64) -> String {
    const MIN: u64 = 60;
    const HOUR: u64 = 60 * MIN;
    const DAY: u64 = 24 * HOUR;
    match secs {
        s if s >= DAY && s % DAY == 0 => format!("{}d", s / DAY),
        s if s >= HOUR && s % HOUR == 0 => format!("{}h", s / HOUR),
        s if s >= HOUR => format!("{}h{}m", s / HOUR, (s % HOUR) / MIN),
        s if s >= MIN && s % MIN == 0 => format!("{}m", s / MIN),
        s => format!("{}s", s),
    }
}
