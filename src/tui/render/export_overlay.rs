use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::App;

use super::centered_fixed;

/// Render the exported prompt string, ready to select and copy
pub fn render_export_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let exported = app.editor.exported();

    let width = area.width.saturating_sub(8).max(20);
    let text_width = width.saturating_sub(2).max(1) as usize;
    // Rough wrapped height: one row per text_width cells plus title and footer
    let body_rows = (exported.chars().count() / text_width + 1) as u16;
    let popup = centered_fixed(width, body_rows + 6, area);
    frame.render_widget(Clear, popup);

    let body = if exported.is_empty() {
        Span::styled("(no tags)", Style::default().fg(app.theme.dim).bg(bg))
    } else {
        Span::styled(exported, Style::default().fg(app.theme.text_bright).bg(bg))
    };
    let lines = vec![
        Line::from(Span::styled(
            " Export",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(body),
        Line::from(""),
        Line::from(Span::styled(
            "any key to close",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
