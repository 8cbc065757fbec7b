//! UI module for rendering the demo form

mod forms;
mod layout;

use crate::app::App;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let main_area = layout::create_layout(area);

    forms::draw_signup(frame, main_area, app);

    layout::draw_status_bar(frame, app);
}
