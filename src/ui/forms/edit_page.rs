//! Issue edit page

use super::field_renderer::{draw_field, FieldView};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw every field of the form, stacked vertically
pub fn draw_edit_page(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.is_changed() {
        " Edit Issue (unsaved changes) "
    } else {
        " Edit Issue "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let constraints: Vec<Constraint> = app
        .fields
        .iter()
        .map(|spec| {
            if spec.is_multiline {
                Constraint::Min(5)
            } else {
                Constraint::Length(3)
            }
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let errors = app.form.errors();

    for (index, (spec, chunk)) in app.fields.iter().zip(chunks.iter()).enumerate() {
        let value = app.field_display(spec);
        let error = errors
            .iter()
            .find(|(name, _)| name == spec.name)
            .and_then(|(_, errs)| errs.first())
            .map(String::as_str);

        draw_field(
            frame,
            *chunk,
            &FieldView {
                label: spec.label,
                value: &value,
                is_active: index == app.active_field,
                is_multiline: spec.is_multiline,
                is_modified: app.is_field_modified(spec.name),
                error,
            },
        );
    }
}
