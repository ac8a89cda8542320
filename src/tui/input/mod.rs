mod common;
mod confirm;
mod mouse;
mod search;
mod tags;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use common::normalize_key;
use confirm::handle_confirm;
use search::handle_search;
use tags::handle_tags;

pub use mouse::{handle_focus_lost, handle_mouse};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    // Quit from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.should_quit = true;
        return;
    }

    // Esc aborts a drag before anything else sees it
    if key.code == KeyCode::Esc && app.editor.cancel_drag() {
        return;
    }

    // Overlays swallow the next key
    if app.show_help || app.show_export {
        app.show_help = false;
        app.show_export = false;
        return;
    }

    let key = normalize_key(key);
    match app.mode {
        Mode::Search => handle_search(app, key, now),
        Mode::Tags => handle_tags(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}
