//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use focusflow_proto::{Priority, ProjectStatus};

use crate::notify::Level;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Brand color for headers and the active tab.
pub const PRIMARY: Color = Color::Rgb(91, 71, 224);

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success color.
pub const SUCCESS: Color = Color::Green;

/// Warning color.
pub const WARNING: Color = Color::Yellow;

/// Error color.
pub const ERROR: Color = Color::Red;

/// Info color.
pub const INFO: Color = Color::Blue;

/// Panel title color for list pages.
pub const LIST_TITLE: Color = Color::Cyan;

/// Panel title color for the filter sidebar.
pub const FILTER_TITLE: Color = Color::Blue;

/// Panel title color for the dashboard.
pub const DASHBOARD_TITLE: Color = Color::Green;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (dates, metadata, completed tasks).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (active tab, focused field).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Completed task titles.
#[must_use]
pub fn completed() -> Style {
    dimmed().add_modifier(Modifier::CROSSED_OUT)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Color of a priority badge.
#[must_use]
pub const fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => ERROR,
        Priority::Medium => WARNING,
        Priority::Low => SUCCESS,
    }
}

/// Color of a project status badge.
#[must_use]
pub const fn project_status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::Planning => INFO,
        ProjectStatus::Active => WARNING,
        ProjectStatus::Completed => SUCCESS,
    }
}

/// Color of a notification.
#[must_use]
pub const fn level_color(level: Level) -> Color {
    match level {
        Level::Success => SUCCESS,
        Level::Error => ERROR,
        Level::Info => INFO,
    }
}

/// Field error text.
#[must_use]
pub fn error_text() -> Style {
    Style::default().fg(ERROR)
}
