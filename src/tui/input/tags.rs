use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::collection::TagRef;
use crate::tui::app::{App, Mode};

pub(super) fn handle_tags(app: &mut App, key: KeyEvent) {
    let len = app.editor.collection().len();
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) | (_, KeyCode::Esc) => app.mode = Mode::Search,
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,
        (KeyModifiers::NONE, KeyCode::Char('?')) => app.show_help = true,

        // Reorder: Shift+arrows or < >
        (m, KeyCode::Left) if m.contains(KeyModifiers::SHIFT) => shift_focused(app, -1),
        (m, KeyCode::Right) if m.contains(KeyModifiers::SHIFT) => shift_focused(app, 1),
        (_, KeyCode::Char('<')) => shift_focused(app, -1),
        (_, KeyCode::Char('>')) => shift_focused(app, 1),

        // Cursor
        (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
            app.tag_cursor = app.tag_cursor.saturating_sub(1);
        }
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
            if app.tag_cursor + 1 < len {
                app.tag_cursor += 1;
            }
        }
        (_, KeyCode::Home) => app.tag_cursor = 0,
        (_, KeyCode::End) => app.tag_cursor = len.saturating_sub(1),

        (KeyModifiers::NONE, KeyCode::Char('x')) | (_, KeyCode::Delete) => remove_focused(app),
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.show_export = true,
        (_, KeyCode::Char('D')) => {
            if len > 0 {
                app.mode = Mode::Confirm;
            }
        }
        _ => {}
    }
}

fn shift_focused(app: &mut App, delta: isize) {
    let from = app.tag_cursor;
    let Some(to) = from.checked_add_signed(delta) else {
        return;
    };
    if to >= app.editor.collection().len() {
        return;
    }
    if app.editor.move_tag(TagRef::Position(from), to) {
        app.tag_cursor = to;
    }
}

fn remove_focused(app: &mut App) {
    let Some(label) = app.editor.collection().get(app.tag_cursor).cloned() else {
        return;
    };
    if app.editor.remove(label.as_str()) {
        app.status_message = Some(format!("removed {}", label));
    }
    app.clamp_tag_cursor();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::drag::{ChipLayout, PointerEvent, PointerKind};
    use crate::tui::render::test_helpers::app_with_tags;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app_with_tags(&["a", "b"]);
        handle_tags(&mut app, key(KeyCode::Left));
        assert_eq!(app.tag_cursor, 0);
        handle_tags(&mut app, key(KeyCode::Char('l')));
        handle_tags(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.tag_cursor, 1);
    }

    #[test]
    fn shift_arrows_move_focused_tag() {
        let mut app = app_with_tags(&["a", "b", "c"]);
        handle_tags(&mut app, KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT));
        assert_eq!(app.editor.exported(), "b, a, c");
        assert_eq!(app.tag_cursor, 1);
        handle_tags(&mut app, key(KeyCode::Char('>')));
        handle_tags(&mut app, key(KeyCode::Char('>')));
        assert_eq!(app.editor.exported(), "b, c, a");
        assert_eq!(app.tag_cursor, 2);
        handle_tags(&mut app, key(KeyCode::Char('<')));
        assert_eq!(app.editor.exported(), "b, a, c");
    }

    #[test]
    fn remove_focused_clamps_cursor() {
        let mut app = app_with_tags(&["a", "b"]);
        app.tag_cursor = 1;
        handle_tags(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.editor.exported(), "a");
        assert_eq!(app.tag_cursor, 0);
        assert_eq!(app.status_message.as_deref(), Some("removed b"));
    }

    #[test]
    fn clear_asks_only_when_non_empty() {
        let mut app = app_with_tags(&[]);
        handle_tags(&mut app, key(KeyCode::Char('D')));
        assert_eq!(app.mode, Mode::Search);
        let mut app = app_with_tags(&["a"]);
        app.mode = Mode::Tags;
        handle_tags(&mut app, key(KeyCode::Char('D')));
        assert_eq!(app.mode, Mode::Confirm);
    }

    #[test]
    fn remove_key_mid_drag_drops_the_preview() {
        let mut app = app_with_tags(&["aa", "bb", "cc"]);
        app.mode = Mode::Tags;
        let layout = ChipLayout::compute(&app.editor.display_order(), Rect::new(0, 0, 40, 1));
        app.editor
            .pointer(PointerEvent::new(PointerKind::Down, 1, 0), &layout);
        assert!(app.editor.drag().is_dragging());
        app.tag_cursor = 1;
        handle_tags(&mut app, key(KeyCode::Char('x')));
        assert!(!app.editor.drag().is_dragging());
        assert_eq!(app.editor.exported(), "aa, cc");
        assert_eq!(app.editor.display_order(), app.editor.collection().labels());
    }
}
