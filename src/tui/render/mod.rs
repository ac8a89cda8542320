pub mod confirm_popup;
pub mod export_overlay;
pub mod help_overlay;
pub mod query_box;
pub mod results;
pub mod status_row;
pub mod tag_strip;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, Mode};

/// Most chip rows the tag strip grows to before clipping
const MAX_STRIP_ROWS: u16 = 6;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let strip_rows = tag_strip::rows_needed(
        &app.editor.display_order(),
        area.width.saturating_sub(2),
    )
    .clamp(1, MAX_STRIP_ROWS);

    // Layout: query box | candidates | tag strip | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // query box
            Constraint::Min(3),                 // candidates
            Constraint::Length(strip_rows + 2), // tag strip + border
            Constraint::Length(1),              // status row
        ])
        .split(area);

    query_box::render_query_box(frame, app, chunks[0]);
    results::render_results(frame, app, chunks[1]);
    tag_strip::render_tag_strip(frame, app, chunks[2]);
    status_row::render_status_row(frame, app, chunks[3]);

    // Overlays (rendered on top of everything)
    if app.mode == Mode::Confirm {
        confirm_popup::render_confirm_popup(frame, app, area);
    }
    if app.show_export {
        export_overlay::render_export_overlay(frame, app, area);
    }
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    let mut has_match = false;
    for m in re.find_iter(text) {
        has_match = true;
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if !has_match {
        spans.push(Span::styled(text.to_string(), base_style));
    } else if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

/// Create a rectangle of fixed size centered in `area`, shrunk to fit
pub(super) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
