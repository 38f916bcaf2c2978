//! Filter sidebar for tasks and the status filter row for projects.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use focusflow_proto::filter::{
    PriorityFilter, ProjectStatusFilter, StatusFilter, TaskCounts, TaskQuery,
    project_status_count,
};
use focusflow_proto::Project;

use super::theme;

fn option_line(label: &str, count: usize, active: bool) -> Line<'static> {
    let marker = if active { "● " } else { "○ " };
    let style = if active {
        theme::highlighted()
    } else {
        theme::normal()
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label}"), style),
        Span::styled(format!(" ({count})"), theme::dimmed()),
    ])
}

/// Render the task filter sidebar with per-option counts.
pub fn render_task_filters(frame: &mut Frame, area: Rect, query: &TaskQuery, counts: &TaskCounts) {
    let mut lines = vec![Line::from(Span::styled("Status (s)", theme::bold()))];
    lines.extend(
        StatusFilter::ALL
            .iter()
            .map(|f| option_line(f.label(), counts.for_status(*f), *f == query.status)),
    );
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Priority (p)", theme::bold())));
    lines.extend(PriorityFilter::ALL.iter().map(|f| {
        option_line(f.label(), counts.for_priority(*f), *f == query.priority)
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("c: clear filters", theme::dimmed())));

    let block = Block::default()
        .title(Span::styled(" Filters ", theme::panel_title(theme::FILTER_TITLE)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line of project status options with counts.
#[must_use]
pub fn project_status_line(projects: &[Project], active: ProjectStatusFilter) -> Line<'static> {
    let mut spans = vec![Span::styled("Status (s): ", theme::bold())];
    for filter in ProjectStatusFilter::ALL {
        let count = project_status_count(projects, filter);
        let style = if filter == active {
            theme::selected()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!(" {} {count} ", filter.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// The search box line. Shows a cursor while typing.
#[must_use]
pub fn search_line(search: &str, editing: bool) -> Line<'static> {
    let mut spans = vec![Span::styled("Search (/): ", theme::bold())];
    if search.is_empty() && !editing {
        spans.push(Span::styled("type / to search", theme::dimmed()));
    } else {
        spans.push(Span::styled(search.to_string(), theme::normal()));
    }
    if editing {
        spans.push(Span::styled("▏", theme::highlighted()));
    }
    Line::from(spans)
}
