//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Page};

fn help_text(app: &App) -> &'static str {
    let form_open = match app.page {
        Page::Tasks => app.tasks.form.is_open(),
        Page::Projects => app.projects.form.is_open(),
        Page::Dashboard => false,
    };
    let searching = match app.page {
        Page::Tasks => app.tasks.searching,
        Page::Projects => app.projects.searching,
        Page::Dashboard => false,
    };
    if form_open {
        "Tab: next field | Enter: save/choose | Esc: cancel"
    } else if app.confirm_delete.is_some() {
        "y: confirm delete | any key: cancel"
    } else if searching {
        "type to search | Enter/Esc: done"
    } else {
        match app.page {
            Page::Dashboard => "n: new task | t: tasks | p: projects | r: refresh | q: quit",
            Page::Tasks => {
                "jk: move | space: toggle | n/e/d: new/edit/delete | JK: reorder | /: search | q: quit"
            }
            Page::Projects => "jk: move | n/e/d: new/edit/delete | /: search | s: status | q: quit",
        }
    }
}

/// Render the status bar at the bottom of the screen.
///
/// The newest live notification takes the place of the help text.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled("Focus Flow", theme::bold()), Span::raw(" | ")];
    match app.notifications.latest() {
        Some(note) => {
            spans.push(Span::styled("●", theme::normal().fg(theme::level_color(note.level))));
            spans.push(Span::raw(format!(" {}", note.message)));
        }
        None => spans.push(Span::styled(help_text(app), theme::dimmed())),
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
