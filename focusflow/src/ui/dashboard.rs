//! Dashboard: progress ring, stat cards and quick actions.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use focusflow_proto::Stats;

use super::theme;
use crate::app::App;

/// Render the dashboard page.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Welcome
            Constraint::Length(3), // Progress
            Constraint::Length(4), // Stat cards
            Constraint::Min(4),    // Quick actions
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled("Welcome to Focus Flow", theme::bold())),
        Line::from(Span::styled(
            "Stay productive and track your progress",
            theme::dimmed(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(welcome, chunks[0]);

    match (&app.dashboard.stats, &app.dashboard.load_error) {
        (Some(stats), _) => {
            render_progress(frame, chunks[1], stats);
            render_cards(frame, chunks[2], stats);
        }
        (None, Some(error)) => {
            let text = Paragraph::new(vec![
                Line::from(Span::styled("Failed to load progress", theme::error_text())),
                Line::from(Span::styled(format!("{error} (r to retry)"), theme::dimmed())),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(text, chunks[1]);
        }
        (None, None) => {
            let text = Paragraph::new(Span::styled("Loading progress...", theme::dimmed()))
                .alignment(Alignment::Center);
            frame.render_widget(text, chunks[1]);
        }
    }

    render_quick_actions(frame, chunks[3]);
}

fn render_progress(frame: &mut Frame, area: Rect, stats: &Stats) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Progress ",
                    theme::panel_title(theme::DASHBOARD_TITLE),
                ))
                .borders(Borders::ALL),
        )
        .gauge_style(theme::normal().fg(theme::PRIMARY))
        .percent(u16::try_from(stats.completion_rate.min(100)).unwrap_or(100))
        .label(format!("{}% complete", stats.completion_rate));
    frame.render_widget(gauge, area);
}

fn render_cards(frame: &mut Frame, area: Rect, stats: &Stats) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let cards: [(&str, usize, Color); 3] = [
        ("Total Tasks", stats.total, theme::INFO),
        ("Completed", stats.completed, theme::SUCCESS),
        ("Active", stats.active, theme::WARNING),
    ];
    for ((label, value, color), chunk) in cards.into_iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            theme::panel_title(color),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(format!(" {label} "), theme::dimmed()))
                .borders(Borders::ALL),
        );
        frame.render_widget(card, *chunk);
    }
}

fn render_quick_actions(frame: &mut Frame, area: Rect) {
    let actions = [
        ("n", "Create New Task", "Add a new task to your list"),
        ("t", "View All Tasks", "Manage and organize your tasks"),
        ("p", "Projects", "Plan milestones and owners"),
    ];
    let lines: Vec<Line> = actions
        .iter()
        .map(|(key, title, hint)| {
            Line::from(vec![
                Span::styled(format!(" {key} "), theme::selected()),
                Span::raw("  "),
                Span::styled(*title, theme::bold()),
                Span::raw("  "),
                Span::styled(*hint, theme::dimmed()),
            ])
        })
        .collect();
    let block = Block::default()
        .title(Span::styled(" Quick Actions ", theme::panel_title(theme::DASHBOARD_TITLE)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
