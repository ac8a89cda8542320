use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

/// y clears every tag, n or Esc backs out
pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            app.mode = Mode::Tags;
            let count = app.editor.collection().len();
            app.editor.clear_confirmed();
            app.tag_cursor = 0;
            app.status_message = Some(format!("cleared {} tags", count));
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.mode = Mode::Tags;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::app_with_tags;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn yes_clears_everything() {
        let mut app = app_with_tags(&["a", "b"]);
        app.mode = Mode::Confirm;
        handle_confirm(&mut app, key(KeyCode::Char('y')));
        assert!(app.editor.collection().is_empty());
        assert_eq!(app.editor.exported(), "");
        assert_eq!(app.mode, Mode::Tags);
    }

    #[test]
    fn no_and_esc_keep_tags() {
        for code in [KeyCode::Char('n'), KeyCode::Esc] {
            let mut app = app_with_tags(&["a"]);
            app.mode = Mode::Confirm;
            handle_confirm(&mut app, key(code));
            assert_eq!(app.editor.exported(), "a");
            assert_eq!(app.mode, Mode::Tags);
        }
    }

    #[test]
    fn other_keys_wait() {
        let mut app = app_with_tags(&["a"]);
        app.mode = Mode::Confirm;
        handle_confirm(&mut app, key(KeyCode::Char('x')));
        assert_eq!(app.mode, Mode::Confirm);
    }
}
