//! Project page: status filter, project cards and delete confirmation.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use focusflow_proto::{Entity, Project, ProjectId};

use super::{centered, filters, task_list, theme, widgets};
use crate::app::App;
use crate::reconcile::ListView;

/// Render the project page.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search
            Constraint::Length(1), // Status filter
            Constraint::Min(3),    // List
        ])
        .split(area);

    let page = &app.projects;
    frame.render_widget(
        Paragraph::new(filters::search_line(&page.query.search, page.searching)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(filters::project_status_line(
            page.list.items(),
            page.query.status,
        )),
        rows[1],
    );

    let view = page.view();
    let title = view
        .footer("project")
        .map_or_else(|| " Projects ".to_string(), |f| format!(" Projects · {f} "));
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::LIST_TITLE)))
        .borders(Borders::ALL);

    match view {
        ListView::Items {
            shown, load_error, ..
        } => {
            let mut items: Vec<ListItem> = Vec::with_capacity(shown.len() + 1);
            if let Some(error) = load_error {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!("Refresh failed: {error} (r to retry)"),
                    theme::error_text(),
                ))));
            }
            let offset = items.len();
            items.extend(shown.iter().map(|project| project_item(project)));
            let list = List::new(items)
                .block(block)
                .highlight_style(theme::selected());
            let mut state = ListState::default().with_selected(Some(page.selected + offset));
            frame.render_stateful_widget(list, rows[2], &mut state);
        }
        other => task_list::render_state(frame, rows[2], &other, "project", block),
    }
}

fn project_item(project: &Project) -> ListItem<'_> {
    let header = Line::from(vec![
        Span::styled(project.name.as_str(), theme::bold()),
        Span::raw("  "),
        widgets::status_badge(project.status),
    ]);
    let mut meta = vec![Span::raw("  ")];
    if !project.milestone.is_empty() {
        meta.push(Span::styled(
            format!("Milestone: {}", widgets::truncate(&project.milestone, 40)),
            theme::normal(),
        ));
        meta.push(Span::raw("  "));
    }
    if let Some(assignee) = project.assignee() {
        meta.push(Span::styled(format!("@{assignee}"), theme::normal()));
    }
    let mut lines = vec![header, Line::from(meta)];
    if !project.description.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", widgets::truncate(&project.description, 70)),
            theme::dimmed(),
        )));
    }
    ListItem::new(lines)
}

/// The "delete this project?" prompt.
pub fn render_confirm(frame: &mut Frame, area: Rect, app: &App, id: ProjectId) {
    let name = app
        .projects
        .list
        .get(id)
        .map_or_else(|| format!("#{id}"), |p| p.name.clone());
    let popup = centered(area, 50, 6);
    frame.render_widget(Clear, popup);
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this project?",
            theme::bold(),
        )),
        Line::from(Span::styled(name, theme::normal())),
        Line::default(),
        Line::from(Span::styled("y: delete   any other key: cancel", theme::dimmed())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Delete Project ", theme::panel_title(theme::ERROR)))
            .borders(Borders::ALL),
    );
    frame.render_widget(text, popup);
}
