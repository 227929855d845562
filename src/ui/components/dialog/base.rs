//! Base dialog component

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Configuration for rendering a dialog
pub struct DialogConfig<'a> {
    pub title: &'a str,
    pub title_color: Color,
    pub border_color: Color,
    /// Body lines, rendered below the title
    pub body: Vec<Line<'a>>,
    /// Hint line at the bottom
    pub hint: Option<Vec<Span<'a>>>,
    pub max_width: u16,
}

/// Center a `width` x `height` box inside `area`, clamped to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Build a hint line from `(key, action)` pairs
pub fn key_hint<'a>(pairs: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (index, (key, action)) in pairs.iter().enumerate() {
        let separator = if index + 1 < pairs.len() { "  " } else { "" };
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}{separator}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

/// Render a red message dialog, one body line per message line
pub fn render_error_dialog(frame: &mut Frame, title: &str, message: &str) {
    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Red,
            border_color: Color::Red,
            body: message.lines().map(Line::from).collect(),
            hint: Some(key_hint(&[("Enter/Esc", "dismiss")])),
            max_width: 60,
        },
    );
}

/// Render a centered dialog overlay
pub fn render_dialog(frame: &mut Frame, config: DialogConfig) {
    let content_width = config
        .body
        .iter()
        .map(Line::width)
        .chain(std::iter::once(config.title.len()))
        .chain(config.hint.iter().map(|h| h.iter().map(Span::width).sum::<usize>()))
        .max()
        .unwrap_or(0) as u16;
    // 2 for borders, 2 for padding
    let dialog_width = (content_width + 4).min(config.max_width);

    // title + blank + body + (blank + hint) + borders
    let hint_lines = if config.hint.is_some() { 2 } else { 0 };
    let dialog_height = (2 + config.body.len() as u16 + hint_lines + 2).max(5);

    let dialog_area = centered_rect(frame.area(), dialog_width, dialog_height);
    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            config.title,
            Style::default()
                .fg(config.title_color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(config.body);

    if let Some(hint_spans) = config.hint {
        content.push(Line::from(""));
        content.push(Line::from(hint_spans));
    }

    let dialog = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(config.border_color))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_in_middle() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(area, 50, 10), Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(2, 3, 20, 5);
        assert_eq!(centered_rect(area, 50, 10), Rect::new(2, 3, 20, 5));
    }

    #[test]
    fn test_key_hint_separates_pairs() {
        let hint = key_hint(&[("Enter", "confirm"), ("Esc", "cancel")]);
        let text: String = hint.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, "Enter confirm  Esc cancel");
        assert_eq!(hint.len(), 4);
    }
}
