use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::editor::drag::ChipLayout;
use crate::model::tag::TagLabel;
use crate::tui::app::{App, Mode};
use crate::util::unicode::truncate_to_width;

/// Chip rows `order` needs at `width` columns
pub fn rows_needed(order: &[TagLabel], width: u16) -> u16 {
    let layout = ChipLayout::compute(order, Rect::new(0, 0, width, u16::MAX));
    layout.chips.last().map_or(0, |chip| chip.rect.y + 1)
}

/// Render the picked tags as wrapping chips. The layout drawn is stored on
/// `app` so pointer events resolve against what is on screen.
pub fn render_tag_strip(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.mode == Mode::Tags;
    let border_color = if focused {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let count = app.editor.collection().len();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" Tags ({}) ", count),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let order = app.editor.display_order();
    app.chip_layout = ChipLayout::compute(&order, inner);

    if order.is_empty() {
        let hint = Paragraph::new(Span::styled(
            "No tags picked yet",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(hint, inner);
        return;
    }

    let session = app.editor.drag().session();
    let cursor_label = app.editor.collection().get(app.tag_cursor);

    for chip in &app.chip_layout.chips {
        let dragged = session.is_some_and(|s| s.label == chip.label);
        let hovered = session
            .and_then(|s| s.hover.as_ref())
            .is_some_and(|(label, _)| *label == chip.label);
        let at_cursor = focused && session.is_none() && cursor_label == Some(&chip.label);

        let style = if dragged {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.chip_drag_bg)
                .add_modifier(Modifier::BOLD)
        } else if at_cursor {
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else if hovered {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.chip_bg)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(app.theme.text).bg(app.theme.chip_bg)
        };

        let inner_width = (chip.rect.width as usize).saturating_sub(2);
        let text = format!(" {} ", truncate_to_width(chip.label.as_str(), inner_width));
        frame.render_widget(Paragraph::new(Span::styled(text, style)), chip.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::drag::{PointerEvent, PointerKind};
    use crate::tui::render::test_helpers::{app_with_tags, render_to_string};

    #[test]
    fn rows_needed_counts_wrapped_rows() {
        let order: Vec<TagLabel> = ["aaaa", "bbbb", "cccc"]
            .iter()
            .filter_map(|s| TagLabel::new(s))
            .collect();
        assert_eq!(rows_needed(&order, 40), 1);
        assert_eq!(rows_needed(&order, 10), 3);
        assert_eq!(rows_needed(&[], 40), 0);
    }

    #[test]
    fn chips_render_in_order() {
        let mut app = app_with_tags(&["1girl", "blue_eyes", "smile"]);
        let out = render_to_string(40, 3, |frame, area| render_tag_strip(frame, &mut app, area));
        insta::assert_snapshot!(out, @r"
        ┌ Tags (3) ────────────────────────────┐
        │ 1girl   blue_eyes   smile            │
        └──────────────────────────────────────┘
        ");
    }

    #[test]
    fn empty_strip_shows_hint() {
        let mut app = app_with_tags(&[]);
        let out = render_to_string(40, 3, |frame, area| render_tag_strip(frame, &mut app, area));
        assert!(out.contains("No tags picked yet"));
        assert!(app.chip_layout.chips.is_empty());
    }

    #[test]
    fn drag_preview_is_drawn_without_committing() {
        let mut app = app_with_tags(&["aa", "bb", "cc"]);
        render_to_string(40, 3, |frame, area| render_tag_strip(frame, &mut app, area));
        let layout = app.chip_layout.clone();
        // Chips sit one column in from the border: " aa " at 1..5, " cc " at 11..15
        app.editor
            .pointer(PointerEvent::new(PointerKind::Down, 12, 1), &layout);
        app.editor
            .pointer(PointerEvent::new(PointerKind::Drag, 1, 1), &layout);
        let out = render_to_string(40, 3, |frame, area| render_tag_strip(frame, &mut app, area));
        assert!(out.contains(" cc   aa   bb "));
        assert_eq!(app.editor.exported(), "aa, bb, cc");
    }
}
