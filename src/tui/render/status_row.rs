use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // Left side: save failure beats transient messages beats the drag state
    let left = if let Some(err) = app.editor.save_error() {
        Span::styled(
            format!("save failed: {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )
    } else if let Some(msg) = &app.status_message {
        Span::styled(msg.clone(), Style::default().fg(app.theme.green).bg(bg))
    } else if let Some(session) = app.editor.drag().session() {
        Span::styled(
            format!("moving {}", session.label),
            Style::default().fg(app.theme.yellow).bg(bg),
        )
    } else {
        Span::styled(
            mode_name(app.mode),
            Style::default().fg(app.theme.dim).bg(bg),
        )
    };
    let left = Span::styled(truncate_to_width(&left.content, width), left.style);

    let mut spans = vec![left];
    if app.show_key_hints {
        let hint = key_hints(app.mode);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Search => "SEARCH",
        Mode::Tags => "TAGS",
        Mode::Confirm => "CONFIRM",
    }
}

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Search => "\u{2191}\u{2193} select  Enter add  Tab tags  Esc clear",
        Mode::Tags => "\u{2190}\u{2192} cursor  < > move  x remove  y export  D clear  ? help",
        Mode::Confirm => "y confirm  n cancel",
    }
}
