//! Field rendering utilities for forms

use reactive_forms::Field;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Height of a rendered field (borders, value line, error line)
pub const FIELD_HEIGHT: u16 = 4;

/// Draw a form field with its touched marker and error.
///
/// Errors are only shown once the field has been touched.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &Field<String>,
    touched: bool,
    error: Option<&str>,
    is_active: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let shown_error = error.filter(|_| touched);
    let border_style = match (shown_error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Cyan),
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let display_str = if field.value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        field.value.clone()
    };

    let cursor = if is_active { "▌" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ])];
    if let Some(error) = shown_error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        )));
    }

    let required = if field.is_required { " *" } else { "" };
    let touched_marker = if touched { " •" } else { "" };
    let block = Block::default()
        .title(format!(" {}{required}{touched_marker} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}
