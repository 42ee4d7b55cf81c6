//! Theme system for the TUI.
//!
//! `ThemeVariant` selects between Dark and Light palettes; `ColorPalette`
//! maps each semantic role of the listing grid to a concrete `Style`.

use crate::feed::HealthStatus;
use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Sections --
    pub group_header: Style,
    pub loading: Style,

    // -- Grid items --
    pub item_border: Style,
    pub item_border_selected: Style,
    pub item_title: Style,
    pub item_meta: Style,
    pub compare_link: Style,

    // -- Health --
    pub health_healthy: Style,
    pub health_degraded: Style,
    pub health_unknown: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            group_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            loading: Style::default().fg(Color::Yellow),

            item_border: Style::default().fg(Color::DarkGray),
            item_border_selected: Style::default().fg(Color::Cyan),
            item_title: Style::default().add_modifier(Modifier::BOLD),
            item_meta: Style::default().fg(Color::Gray),
            compare_link: Style::default().fg(Color::Blue),

            health_healthy: Style::default().fg(Color::Green),
            health_degraded: Style::default().fg(Color::Red),
            health_unknown: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
        }
    }

    fn light() -> Self {
        Self {
            group_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            loading: Style::default().fg(Color::Magenta),

            item_border: Style::default().fg(Color::Gray),
            item_border_selected: Style::default().fg(Color::Blue),
            item_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_meta: Style::default().fg(Color::DarkGray),
            compare_link: Style::default().fg(Color::Blue),

            health_healthy: Style::default().fg(Color::Green),
            health_degraded: Style::default().fg(Color::Red),
            health_unknown: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
        }
    }

    pub fn health(&self, status: HealthStatus) -> Style {
        match status {
            HealthStatus::Healthy => self.health_healthy,
            HealthStatus::Degraded => self.health_degraded,
            HealthStatus::Unknown => self.health_unknown,
        }
    }
}
