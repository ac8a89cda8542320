use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_fixed;

/// Render the "clear all tags" confirmation popup
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let count = app.editor.collection().len();

    let header_style = Style::default()
        .fg(app.theme.red)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled(" Clear tags", header_style)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Remove all {} tag{}?",
                count,
                if count == 1 { "" } else { "s" }
            ),
            text_style,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", key_style),
            Span::styled(" confirm   ", text_style),
            Span::styled("n", key_style),
            Span::styled(" cancel", text_style),
        ]),
    ];

    let popup = centered_fixed(36, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
