//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use components::{render_error_dialog, render_leave_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    forms::draw_edit_page(frame, main_area, app);

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Overlays
    if let Some(selected) = app.leave_dialog {
        render_leave_dialog(frame, selected, &app.registry.changed_fields(&app.form));
    } else if let Some(message) = &app.error_message {
        render_error_dialog(frame, "Cannot save", message);
    }
}
