//! Terminal UI rendering.
//!
//! Rendering is stateless: every frame is drawn from [`App`] alone.

pub mod dashboard;
pub mod filters;
pub mod form;
pub mod project_list;
pub mod status_bar;
pub mod task_list;
pub mod theme;
pub mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::Tabs,
};

use crate::app::{App, Page};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], app);

    match app.page {
        Page::Dashboard => dashboard::render(frame, chunks[1], app),
        Page::Tasks => task_list::render(frame, chunks[1], app),
        Page::Projects => project_list::render(frame, chunks[1], app),
    }

    status_bar::render(frame, chunks[2], app);

    // Overlays last so they sit on top of the page.
    match app.page {
        Page::Tasks if app.tasks.form.is_open() => {
            form::render(frame, frame.area(), &app.tasks.form, "Task");
        }
        Page::Projects if app.projects.form.is_open() => {
            form::render(frame, frame.area(), &app.projects.form, "Project");
        }
        Page::Projects => {
            if let Some(id) = app.confirm_delete {
                project_list::render_confirm(frame, frame.area(), app, id);
            }
        }
        _ => {}
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
        .collect();
    let selected = Page::ALL.iter().position(|p| *p == app.page).unwrap_or(0);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(14), Constraint::Min(10)])
        .split(area);

    frame.render_widget(
        Span::styled(" Focus Flow ", theme::panel_title(theme::PRIMARY)),
        chunks[0],
    );
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme::dimmed())
        .highlight_style(theme::highlighted());
    frame.render_widget(tabs, chunks[1]);
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
