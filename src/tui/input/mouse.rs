use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::editor::drag::{DragOutcome, PointerEvent, PointerKind};
use crate::tui::app::App;

/// Route a mouse event to the candidate list or the tag strip
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = result_row_at(app, column, row) {
                if app.editor.pick(index)
                    && let Some(tag) = app.editor.search().selected_tag()
                {
                    app.status_message = Some(format!("added {}", tag.label));
                }
                return;
            }
            if !app.chip_layout.contains(column, row) {
                return;
            }
            let layout = app.chip_layout.clone();
            let outcome = app
                .editor
                .pointer(PointerEvent::new(PointerKind::Down, column, row), &layout);
            if outcome == DragOutcome::Started
                && let Some(session) = app.editor.drag().session()
            {
                app.tag_cursor = session.origin;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.editor.drag().is_dragging() {
                let layout = app.chip_layout.clone();
                app.editor
                    .pointer(PointerEvent::new(PointerKind::Drag, column, row), &layout);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.editor.drag().is_dragging() {
                let layout = app.chip_layout.clone();
                let outcome = app
                    .editor
                    .pointer(PointerEvent::new(PointerKind::Up, column, row), &layout);
                if let DragOutcome::Dropped(cmd) = outcome
                    && let Some(pos) = app.editor.collection().position(cmd.label.as_str())
                {
                    app.tag_cursor = pos;
                }
            }
        }
        MouseEventKind::ScrollDown => {
            if in_results(app, column, row) {
                app.editor.search_mut().select_next();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_results(app, column, row) {
                app.editor.search_mut().select_prev();
            }
        }
        _ => {}
    }
}

/// Losing focus mid-drag means the release may never arrive
pub fn handle_focus_lost(app: &mut App) {
    let layout = app.chip_layout.clone();
    app.editor
        .pointer(PointerEvent::new(PointerKind::Leave, 0, 0), &layout);
}

fn in_results(app: &App, column: u16, row: u16) -> bool {
    app.results_area
        .is_some_and(|area| area.contains(Position::new(column, row)))
}

/// Index into the candidate list of the row under the pointer
fn result_row_at(app: &App, column: u16, row: u16) -> Option<usize> {
    let area = app.results_area?;
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    let index = app.results_scroll + usize::from(row - area.y);
    (index < app.editor.search().results().len()).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::drag::ChipLayout;
    use crate::model::search::SearchResponse;
    use crate::model::tag::{Tag, TagLabel};
    use crate::tui::render::test_helpers::app_with_tags;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::time::{Duration, Instant};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn strip(app: &mut App) {
        app.chip_layout =
            ChipLayout::compute(&app.editor.display_order(), Rect::new(0, 0, 40, 1));
    }

    #[test]
    fn drag_reorders_on_release() {
        let mut app = app_with_tags(&["aa", "bb", "cc"]);
        strip(&mut app);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 11, 0));
        assert_eq!(app.tag_cursor, 2);
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 1, 0));
        assert_eq!(app.editor.exported(), "aa, bb, cc");
        strip(&mut app);
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 1, 0));
        assert_eq!(app.editor.exported(), "cc, aa, bb");
        assert_eq!(app.tag_cursor, 0);
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut app = app_with_tags(&["aa", "bb"]);
        strip(&mut app);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 0));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 8, 0));
        handle_focus_lost(&mut app);
        assert!(!app.editor.drag().is_dragging());
        assert_eq!(app.editor.exported(), "aa, bb");
    }

    #[test]
    fn click_on_result_row_adds_it() {
        let t0 = Instant::now();
        let mut app = app_with_tags(&[]);
        app.editor.set_query("hair", t0);
        let request = app
            .editor
            .search_mut()
            .poll(t0 + Duration::from_millis(300))
            .unwrap();
        app.editor.apply_response(SearchResponse {
            token: request.token,
            outcome: Ok(["long_hair", "short_hair"]
                .iter()
                .map(|l| Tag::new(TagLabel::new(l).unwrap(), None))
                .collect()),
        });
        app.results_area = Some(Rect::new(0, 5, 30, 4));
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 3, 6));
        assert_eq!(app.editor.exported(), "short_hair");
        // Below the last result: nothing
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 3, 8));
        assert_eq!(app.editor.exported(), "short_hair");
    }
}
