mod edit;
mod mouse;
mod search;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

pub use edit::insert_text_at_cursor;
pub use mouse::handle_mouse;

use edit::handle_edit;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.message = None;

    // An on-screen reminder swallows the first key
    if app.reminder.take().is_some() {
        return;
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode {
        Mode::Edit => handle_edit(app, key),
        Mode::Search => handle_search(app, key),
    }
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    match app.mode {
        Mode::Edit => {
            let clean = text.replace("\r\n", "\n").replace('\r', "\n");
            insert_text_at_cursor(app, &clean);
        }
        Mode::Search => {
            // Search is single-line
            app.search_input.push_str(&text.replace(['\r', '\n'], " "));
        }
    }
}
