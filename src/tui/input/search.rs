use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::util::unicode::{pop_grapheme, pop_word};

use super::common::typed_char;

pub(super) fn handle_search(app: &mut App, key: KeyEvent, now: Instant) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Tab) => {
            app.mode = Mode::Tags;
            app.clamp_tag_cursor();
        }
        (_, KeyCode::Esc) => set_query(app, String::new(), now),
        (_, KeyCode::Enter) => {
            if let Some(tag) = app.editor.search().selected_tag() {
                let label = tag.label.clone();
                if app.editor.pick_selected() {
                    app.status_message = Some(format!("added {}", label));
                } else {
                    app.status_message = Some(format!("{} is already picked", label));
                }
            }
        }
        (_, KeyCode::Down) => app.editor.search_mut().select_next(),
        (_, KeyCode::Up) => app.editor.search_mut().select_prev(),
        (_, KeyCode::Backspace) => {
            let mut query = app.editor.search().query().to_string();
            if pop_grapheme(&mut query) {
                set_query(app, query, now);
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            let mut query = app.editor.search().query().to_string();
            pop_word(&mut query);
            set_query(app, query, now);
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => set_query(app, String::new(), now),
        _ => {
            if let Some(c) = typed_char(&key) {
                let mut query = app.editor.search().query().to_string();
                query.push(c);
                set_query(app, query, now);
            }
        }
    }
}

fn set_query(app: &mut App, query: String, now: Instant) {
    app.editor.set_query(&query, now);
    app.results_scroll = 0;
}
