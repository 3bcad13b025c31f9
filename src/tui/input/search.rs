use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search
        (_, KeyCode::Esc) => {
            app.mode = Mode::Edit;
            app.search_input.clear();
        }

        // Execute search
        (_, KeyCode::Enter) => {
            app.mode = Mode::Edit;
            if !app.search_input.is_empty() {
                app.last_search = Some(std::mem::take(&mut app.search_input));
                if !app.find_next_match() {
                    app.message = Some("no match".into());
                }
            }
        }

        (_, KeyCode::Backspace) => {
            if app.search_input.pop().is_none() {
                app.mode = Mode::Edit;
            }
        }

        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            app.search_input.push(c);
        }
        _ => {}
    }
}
