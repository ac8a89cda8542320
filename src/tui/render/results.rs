use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::editor::search_client::{Candidates, SearchState};
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::push_highlighted_spans;

/// Render the candidate list with its placeholders. Records the rows area
/// on `app` for click hit-testing.
pub fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let busy = matches!(
        app.editor.search().state(),
        SearchState::Pending { .. } | SearchState::InFlight { .. }
    );
    let title = if busy { " Searching\u{2026} " } else { " Results " };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(app.theme.dim).bg(bg)))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.results_area = None;
    let message = match app.editor.search().candidates() {
        Candidates::Hidden if busy => Some(("Searching\u{2026}".to_string(), app.theme.dim)),
        Candidates::Hidden => Some(("Type to search tags".to_string(), app.theme.dim)),
        Candidates::NoResults => Some(("No results found".to_string(), app.theme.yellow)),
        Candidates::Failed(reason) => {
            Some((format!("Search failed: {}", reason), app.theme.red))
        }
        Candidates::Results(_) => None,
    };

    match message {
        Some((text, color)) => {
            let placeholder = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(color).bg(bg),
            )));
            frame.render_widget(placeholder, inner);
        }
        None => render_rows(frame, app, inner),
    }
}

fn render_rows(frame: &mut Frame, app: &mut App, inner: Rect) {
    let bg = app.theme.background;
    let visible = inner.height as usize;
    app.scroll_results_to_selection(visible);
    app.results_area = Some(inner);

    let re = app.query_re();
    let search = app.editor.search();
    let width = inner.width as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (i, tag) in search
        .results()
        .iter()
        .enumerate()
        .skip(app.results_scroll)
        .take(visible)
    {
        let selected = i == search.selected();
        let picked = app.editor.collection().contains(tag.label.as_str());
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let fg = if picked {
            app.theme.dim
        } else if selected {
            app.theme.text_bright
        } else {
            app.theme.text
        };
        let base = Style::default().fg(fg).bg(row_bg);
        let hl = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);

        let marker = if picked { "\u{2713} " } else { "  " };
        let usage = tag.usage_text().unwrap_or_default();
        let label_room = width
            .saturating_sub(display_width(marker))
            .saturating_sub(display_width(&usage) + 1);
        let label = truncate_to_width(tag.label.as_str(), label_room);

        let mut spans = vec![Span::styled(
            marker,
            Style::default().fg(app.theme.green).bg(row_bg),
        )];
        push_highlighted_spans(&mut spans, &label, base, hl, re.as_ref());

        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let pad = width.saturating_sub(used + display_width(&usage));
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));
        spans.push(Span::styled(
            usage,
            Style::default()
                .fg(app.theme.dim)
                .bg(row_bg)
                .add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::search::SearchResponse;
    use crate::model::tag::{Tag, TagLabel};
    use crate::tui::render::test_helpers::{app_with_tags, render_to_string};
    use std::time::{Duration, Instant};

    fn settle(app: &mut App, query: &str, outcome: Result<Vec<Tag>, String>) {
        let t0 = Instant::now();
        app.editor.set_query(query, t0);
        let request = app
            .editor
            .search_mut()
            .poll(t0 + Duration::from_millis(300))
            .unwrap();
        app.editor.apply_response(SearchResponse {
            token: request.token,
            outcome,
        });
    }

    fn tag(label: &str, uses: Option<u64>) -> Tag {
        Tag::new(TagLabel::new(label).unwrap(), uses)
    }

    #[test]
    fn rows_show_usage_and_picked_marker() {
        let mut app = app_with_tags(&["red_eyes"]);
        settle(
            &mut app,
            "red",
            Ok(vec![tag("red_eyes", Some(1200)), tag("red_hair", None)]),
        );
        let out = render_to_string(30, 4, |frame, area| render_results(frame, &mut app, area));
        insta::assert_snapshot!(out, @r"
        ┌ Results ───────────────────┐
        │✓ red_eyes         1200 uses│
        │  red_hair                  │
        └────────────────────────────┘
        ");
        assert_eq!(app.results_area, Some(Rect::new(1, 1, 28, 2)));
    }

    #[test]
    fn no_results_placeholder() {
        let mut app = app_with_tags(&[]);
        settle(&mut app, "zzz", Ok(vec![]));
        let out = render_to_string(30, 3, |frame, area| render_results(frame, &mut app, area));
        assert!(out.contains("No results found"));
        assert_eq!(app.results_area, None);
    }

    #[test]
    fn failure_placeholder_names_reason() {
        let mut app = app_with_tags(&[]);
        settle(&mut app, "red", Err("timed out".into()));
        let out = render_to_string(40, 3, |frame, area| render_results(frame, &mut app, area));
        assert!(out.contains("Search failed: timed out"));
    }

    #[test]
    fn pending_query_shows_searching() {
        let mut app = app_with_tags(&[]);
        app.editor.set_query("red", Instant::now());
        let out = render_to_string(30, 3, |frame, area| render_results(frame, &mut app, area));
        assert!(out.contains("Searching\u{2026}"));
    }

    #[test]
    fn list_scrolls_to_selection() {
        let mut app = app_with_tags(&[]);
        let tags = (0..6).map(|i| tag(&format!("tag{}", i), None)).collect();
        settle(&mut app, "tag", Ok(tags));
        for _ in 0..4 {
            app.editor.search_mut().select_next();
        }
        let out = render_to_string(20, 4, |frame, area| render_results(frame, &mut app, area));
        assert!(out.contains("tag4"));
        assert!(!out.contains("tag0"));
        assert_eq!(app.results_scroll, 3);
    }
}
