use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, tail_to_width};

/// Render the query input box
pub fn render_query_box(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.mode == Mode::Search;
    let border_color = if focused {
        app.theme.selection_border
    } else {
        app.theme.dim
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Search ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let query = app.editor.search().query();
    let prompt = "> ";
    // Keep the tail of a long query visible, leaving room for the cursor
    let room = (inner.width as usize).saturating_sub(display_width(prompt) + 1);
    let visible = tail_to_width(query, room);

    let mut spans = vec![
        Span::styled(prompt, Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(visible, Style::default().fg(app.theme.text_bright).bg(bg)),
    ];
    if focused {
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        inner,
    );
}
