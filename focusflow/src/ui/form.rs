//! Create/edit form modal with its searchable picker.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::{centered, theme};
use crate::forms::{Draft, FieldKind, Form, FormMode, FormPhase, Picker};

/// Render `form` as a modal over `area`. `noun` is `"Task"` or `"Project"`.
pub fn render<D: Draft>(frame: &mut Frame, area: Rect, form: &Form<D>, noun: &str) {
    let height = u16::try_from(D::FIELDS.len() * 2 + 5).unwrap_or(u16::MAX);
    let popup = centered(area, 64, height);
    frame.render_widget(Clear, popup);

    let title = match form.mode() {
        FormMode::Create => format!(" New {noun} "),
        FormMode::Edit(_) => format!(" Edit {noun} "),
    };

    let mut lines = Vec::with_capacity(D::FIELDS.len() * 2 + 2);
    for field in D::FIELDS {
        let focused = *field == form.focused();
        let label_style = if focused {
            theme::highlighted()
        } else {
            theme::bold()
        };
        let value = form.draft().display(*field);
        let hint = match field.kind() {
            FieldKind::Text if focused => "▏",
            FieldKind::Cycle if focused => "  ◂ ▸",
            FieldKind::Lookup if focused => "  Enter: choose",
            _ => "",
        };
        let shown = if value.is_empty() && field.kind() == FieldKind::Lookup {
            Span::styled("None", theme::dimmed())
        } else {
            Span::styled(value, theme::normal())
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>12}: ", field.label()), label_style),
            shown,
            Span::styled(hint, theme::dimmed()),
        ]));
        let error = form
            .errors()
            .get(*field)
            .map_or_else(Line::default, |message| {
                Line::from(Span::styled(format!("{:>14}{message}", ""), theme::error_text()))
            });
        lines.push(error);
    }
    lines.push(Line::default());
    let footer = if form.phase() == FormPhase::Submitting {
        Span::styled("Saving...", theme::highlighted())
    } else {
        Span::styled(
            "Tab: next field   Enter/Ctrl-S: save   Esc: cancel",
            theme::dimmed(),
        )
    };
    lines.push(Line::from(footer));

    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::PRIMARY)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), popup);

    if let Some(picker) = form.picker() {
        render_picker(frame, popup, picker, form.focused().label());
    }
}

fn render_picker(frame: &mut Frame, over: Rect, picker: &Picker, label: &str) {
    let popup = centered(over, 40, 10);
    frame.render_widget(Clear, popup);

    let filtered = picker.filtered();
    let items: Vec<ListItem> = if filtered.is_empty() {
        vec![ListItem::new(Span::styled("No options found", theme::dimmed()))]
    } else {
        filtered
            .iter()
            .map(|choice| ListItem::new(choice.label()))
            .collect()
    };
    let title = format!(" {label}: {}▏ ", picker.search());
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(title, theme::highlighted()))
                .borders(Borders::ALL),
        )
        .highlight_style(theme::selected());
    let mut state = ListState::default()
        .with_selected((!filtered.is_empty()).then_some(picker.highlighted()));
    frame.render_stateful_widget(list, popup, &mut state);
}
