//! Sign-up form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw every field of the form in registration order
pub fn draw_signup(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Sign up ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let keys = app.form.keys();
    let mut constraints: Vec<Constraint> = keys
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let errors = app.form.errors();
    for (index, key) in keys.iter().enumerate() {
        let Some(field) = app.form.field(key) else {
            continue;
        };
        let error = errors.get(key).and_then(|error| error.as_deref());
        draw_field(
            frame,
            chunks[index],
            &field,
            app.form.is_touched(key),
            error,
            index == app.active_field,
        );
    }
}
