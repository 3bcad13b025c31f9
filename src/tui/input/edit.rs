use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::editor::TextBuffer;
use crate::tui::app::{App, Mode};
use crate::util::text;

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    app.follow_cursor = true;
    match (key.modifiers, key.code) {
        // Session
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            app.save_or_report();
            if app.message.is_none() {
                app.message = Some("saved".into());
            }
        }

        // Gutter toggle for the cursor line
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
            if app.gutter_click(app.cursor_line).is_none() {
                app.message = Some("comments are not part of the task cycle".into());
            }
        }

        // Search
        (KeyModifiers::CONTROL, KeyCode::Char('f')) => {
            app.mode = Mode::Search;
            app.search_input.clear();
        }
        (_, KeyCode::F(3)) => {
            if app.last_search.is_some() && !app.find_next_match() {
                app.message = Some("no match".into());
            }
        }

        // Reminders
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => app.toggle_reminders(),
        (KeyModifiers::CONTROL, KeyCode::Up) => {
            let mins = app.scheduler.interval_mins().saturating_add(1);
            app.set_interval(mins);
        }
        (KeyModifiers::CONTROL, KeyCode::Down) => {
            let mins = app.scheduler.interval_mins().saturating_sub(1);
            app.set_interval(mins);
        }

        (_, KeyCode::F(1)) => app.show_help = true,
        (_, KeyCode::Esc) => {
            app.last_search = None;
        }

        // Word motion
        (KeyModifiers::CONTROL, KeyCode::Left) => {
            app.cursor_col = text::word_left(app.current_line(), app.cursor_col);
            app.sticky_col = None;
        }
        (KeyModifiers::CONTROL, KeyCode::Right) => {
            app.cursor_col = text::word_right(app.current_line(), app.cursor_col);
            app.sticky_col = None;
        }

        // Cursor motion
        (_, KeyCode::Left) => move_left(app),
        (_, KeyCode::Right) => move_right(app),
        (_, KeyCode::Up) => move_vertical(app, -1),
        (_, KeyCode::Down) => move_vertical(app, 1),
        (_, KeyCode::PageUp) => {
            let page = app.editor_area.height.max(1) as isize;
            move_vertical(app, -page);
        }
        (_, KeyCode::PageDown) => {
            let page = app.editor_area.height.max(1) as isize;
            move_vertical(app, page);
        }
        (_, KeyCode::Home) => {
            app.cursor_col = 0;
            app.sticky_col = None;
        }
        (_, KeyCode::End) => {
            app.cursor_col = app.current_line().len();
            app.sticky_col = None;
        }

        // Text edits
        (_, KeyCode::Enter) => insert_text_at_cursor(app, "\n"),
        (_, KeyCode::Tab) => insert_text_at_cursor(app, "\t"),
        (_, KeyCode::Backspace) => backspace(app),
        (_, KeyCode::Delete) => delete(app),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let mut buf = [0u8; 4];
            insert_text_at_cursor(app, c.encode_utf8(&mut buf));
        }
        _ => {}
    }
}

/// Insert text (possibly spanning lines) at the cursor and move past it
pub fn insert_text_at_cursor(app: &mut App, text: &str) {
    let (line, col) = app
        .sync
        .buffer_mut()
        .insert_text(app.cursor_line, app.cursor_col, text);
    app.cursor_line = line;
    app.cursor_col = col;
    app.sticky_col = None;
    app.after_edit();
}

fn backspace(app: &mut App) {
    app.sticky_col = None;
    let line = app.cursor_line;
    if let Some(prev) = text::prev_boundary(app.current_line(), app.cursor_col) {
        let current = app.current_line();
        let updated = format!("{}{}", &current[..prev], &current[app.cursor_col..]);
        app.sync.buffer_mut().set_line(line, &updated);
        app.cursor_col = prev;
        app.after_edit();
    } else if line > 0 {
        let prev_len = app.line(line - 1).len();
        app.sync.buffer_mut().join_with_next(line - 1);
        app.cursor_line = line - 1;
        app.cursor_col = prev_len;
        app.after_edit();
    }
}

fn delete(app: &mut App) {
    app.sticky_col = None;
    let line = app.cursor_line;
    if let Some(next) = text::next_boundary(app.current_line(), app.cursor_col) {
        let current = app.current_line();
        let updated = format!("{}{}", &current[..app.cursor_col], &current[next..]);
        app.sync.buffer_mut().set_line(line, &updated);
        app.after_edit();
    } else if line + 1 < app.line_count() {
        app.sync.buffer_mut().join_with_next(line);
        app.after_edit();
    }
}

fn move_left(app: &mut App) {
    app.sticky_col = None;
    if let Some(prev) = text::prev_boundary(app.current_line(), app.cursor_col) {
        app.cursor_col = prev;
    } else if app.cursor_line > 0 {
        app.cursor_line -= 1;
        app.cursor_col = app.current_line().len();
    }
}

fn move_right(app: &mut App) {
    app.sticky_col = None;
    if let Some(next) = text::next_boundary(app.current_line(), app.cursor_col) {
        app.cursor_col = next;
    } else if app.cursor_line + 1 < app.line_count() {
        app.cursor_line += 1;
        app.cursor_col = 0;
    }
}

/// Move up (negative) or down by `delta` lines, keeping the display column
fn move_vertical(app: &mut App, delta: isize) {
    let goal = app
        .sticky_col
        .unwrap_or_else(|| text::col_of_offset(app.current_line(), app.cursor_col));
    let last = app.line_count() as isize - 1;
    let target = (app.cursor_line as isize + delta).clamp(0, last) as usize;
    app.cursor_line = target;
    app.cursor_col = text::offset_at_col(app.current_line(), goal);
    app.sticky_col = Some(goal);
}
