//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// How a field should be drawn
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub is_active: bool,
    pub is_multiline: bool,
    /// Value differs from the baseline
    pub is_modified: bool,
    /// First validation error, if any
    pub error: Option<&'a str>,
}

/// Draw a form field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView) {
    let style = if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = if field.value.is_empty() && !field.is_active {
        "(empty)"
    } else {
        field.value
    };

    let cursor = if field.is_active { "▌" } else { "" };

    let content = if field.is_multiline {
        let mut lines: Vec<Line> = display_value
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if display_value.ends_with('\n') {
            lines.push(Line::from(""));
        }
        if field.is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let marker = if field.is_modified { " *" } else { "" };
    let mut block = Block::default()
        .title(format!(" {}{} ", field.label, marker))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = field.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
