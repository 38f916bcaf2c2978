//! Task page: filter sidebar, search box, task cards and footer.

use chrono::{Local, NaiveDate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use focusflow_proto::Task;
use focusflow_proto::filter::TaskCounts;

use super::{filters, theme, widgets};
use crate::app::App;
use crate::reconcile::ListView;

/// Render the task page.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(area);

    let counts = TaskCounts::from_tasks(app.tasks.list.items());
    filters::render_task_filters(frame, columns[0], &app.tasks.query, &counts);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search
            Constraint::Min(3),    // List
            Constraint::Length(1), // Footer
        ])
        .split(columns[1]);

    frame.render_widget(
        Paragraph::new(filters::search_line(
            &app.tasks.query.search,
            app.tasks.searching,
        )),
        rows[0],
    );

    let view = app.tasks.view();
    let block = Block::default()
        .title(Span::styled(" Tasks ", theme::panel_title(theme::LIST_TITLE)))
        .borders(Borders::ALL);

    if let Some(footer) = view.footer("task") {
        frame.render_widget(
            Paragraph::new(Span::styled(footer, theme::dimmed())).alignment(Alignment::Center),
            rows[2],
        );
    }

    match view {
        ListView::Items {
            shown, load_error, ..
        } => {
            let today = Local::now().date_naive();
            let mut items: Vec<ListItem> = Vec::with_capacity(shown.len() + 1);
            if let Some(error) = load_error {
                items.push(ListItem::new(Line::from(Span::styled(
                    format!("Refresh failed: {error} (r to retry)"),
                    theme::error_text(),
                ))));
            }
            let offset = items.len();
            items.extend(shown.iter().map(|task| task_item(app, task, today)));

            let list = List::new(items)
                .block(block)
                .highlight_style(theme::selected());
            let mut state = ListState::default().with_selected(Some(app.tasks.selected + offset));
            frame.render_stateful_widget(list, rows[1], &mut state);
        }
        other => render_state(frame, rows[1], &other, "task", block),
    }
}

fn task_item<'a>(app: &'a App, task: &'a Task, today: NaiveDate) -> ListItem<'a> {
    let pending = app.tasks.list.is_pending(task.id);
    let title_style = if task.completed {
        theme::completed()
    } else {
        theme::bold()
    };
    let header = Line::from(vec![
        widgets::checkbox(task.completed, pending),
        Span::raw(" "),
        Span::styled(task.title.as_str(), title_style),
        Span::raw("  "),
        widgets::priority_badge(task.priority),
    ]);

    let mut meta = vec![Span::raw("    ")];
    if !task.description.is_empty() {
        meta.push(Span::styled(
            widgets::truncate(&task.description, 40),
            theme::dimmed(),
        ));
        meta.push(Span::raw("  "));
    }
    if !task.assignee.is_empty() {
        meta.push(Span::styled(format!("@{}", task.assignee), theme::normal()));
        meta.push(Span::raw("  "));
    }
    if let Some(project_id) = task.project_id {
        let name = app
            .project_name(project_id)
            .map_or_else(|| format!("#{project_id}"), |name| format!("#{name}"));
        meta.push(Span::styled(name, theme::normal().fg(theme::PRIMARY)));
        meta.push(Span::raw("  "));
    }
    if let Some(created) = task.created_at {
        meta.push(Span::styled(
            widgets::relative_date(created, today, &app.timestamp_format),
            theme::dimmed(),
        ));
    }

    ListItem::new(vec![header, Line::from(meta)])
}

/// Renders the loading, error and empty states of a list page.
pub fn render_state<E>(
    frame: &mut Frame,
    area: Rect,
    view: &ListView<'_, E>,
    kind: &str,
    block: Block<'_>,
) {
    let lines = match view {
        ListView::Loading => vec![Line::from(Span::styled(
            format!("Loading {kind}s..."),
            theme::dimmed(),
        ))],
        ListView::Failed { message } => vec![
            Line::from(Span::styled(
                format!("Failed to load {kind}s"),
                theme::error_text(),
            )),
            Line::from(Span::styled(*message, theme::dimmed())),
            Line::default(),
            Line::from(Span::styled("Press r to try again", theme::highlighted())),
        ],
        ListView::Empty(state) => vec![
            Line::from(Span::styled(state.title(kind), theme::bold())),
            Line::from(Span::styled(state.description(kind), theme::dimmed())),
            Line::default(),
            Line::from(Span::styled(
                format!("Enter: {}", state.action_label(kind)),
                theme::highlighted(),
            )),
        ],
        ListView::Items { .. } => Vec::new(),
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}
