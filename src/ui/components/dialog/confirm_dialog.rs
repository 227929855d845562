//! Unsaved-changes confirmation dialog

use super::base::{key_hint, render_dialog, DialogConfig};
use crate::app::LeaveOption;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Render the dialog asked before leaving a modified form
pub fn render_leave_dialog(frame: &mut Frame, selected: LeaveOption, changed_fields: &[String]) {
    let mut body = vec![
        Line::from("You have unsaved changes in:"),
        Line::from(Span::styled(
            changed_fields.join(", "),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
    ];

    let options = [
        (LeaveOption::Cancel, "Keep editing", Color::White),
        (LeaveOption::Discard, "Discard changes", Color::Red),
    ];
    for (option, label, color) in options {
        let is_selected = option == selected;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        body.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    let hint = key_hint(&[("↑↓", "select"), ("Enter", "confirm"), ("Esc", "cancel")]);

    render_dialog(
        frame,
        DialogConfig {
            title: "Leave without saving?",
            title_color: Color::Yellow,
            border_color: Color::Yellow,
            body,
            hint: Some(hint),
            max_width: 50,
        },
    );
}
