//! Small building blocks shared by the pages: badges, checkboxes, dates.

use chrono::{DateTime, Local, NaiveDate, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use focusflow_proto::{Priority, ProjectStatus};

use super::theme;

/// `[x]` or `[ ]`, dimmed while a change is in flight.
#[must_use]
pub fn checkbox(done: bool, pending: bool) -> Span<'static> {
    let symbol = if done { "[✓]" } else { "[ ]" };
    let style = if pending {
        theme::dimmed().add_modifier(Modifier::SLOW_BLINK)
    } else if done {
        theme::normal().fg(theme::SUCCESS)
    } else {
        theme::normal()
    };
    Span::styled(symbol, style)
}

fn badge(label: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {label} "),
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )
}

/// Colored priority label.
#[must_use]
pub fn priority_badge(priority: Priority) -> Span<'static> {
    badge(priority.label(), theme::priority_color(priority))
}

/// Colored project status label.
#[must_use]
pub fn status_badge(status: ProjectStatus) -> Span<'static> {
    badge(status.label(), theme::project_status_color(status))
}

/// "Today", "Yesterday" or `at` formatted with `format`, relative to
/// `today` in local time.
#[must_use]
pub fn relative_date(at: DateTime<Utc>, today: NaiveDate, format: &str) -> String {
    let day = at.with_timezone(&Local).date_naive();
    if day == today {
        "Today".to_string()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else {
        at.with_timezone(&Local).format(format).to_string()
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
