use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::tui::app::{App, Mode};
use crate::util::text;

/// Lines moved per wheel notch
const WHEEL_STEP: usize = 3;

/// Handle a mouse event: gutter clicks cycle status, text clicks move the
/// cursor, the wheel scrolls.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let area = app.editor_area;
    let gutter_left = area.x.saturating_sub(app.gutter_width);
    let in_rows = mouse.row >= area.y && mouse.row < area.y + area.height;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if in_rows => {
            if app.reminder.take().is_some() {
                return;
            }
            let line = app.scroll_offset + (mouse.row - area.y) as usize;
            if line >= app.line_count() {
                return;
            }
            app.message = None;
            app.mode = Mode::Edit;

            if mouse.column >= gutter_left && mouse.column < area.x {
                app.gutter_click(line);
            } else if mouse.column >= area.x && mouse.column < area.x + area.width {
                let col = app.h_scroll + (mouse.column - area.x) as usize;
                app.cursor_line = line;
                app.cursor_col = text::offset_at_col(app.current_line(), col);
                app.sticky_col = None;
                app.follow_cursor = true;
            }
        }
        MouseEventKind::ScrollUp => {
            app.follow_cursor = false;
            app.scroll_offset = app.scroll_offset.saturating_sub(WHEEL_STEP);
        }
        MouseEventKind::ScrollDown => {
            app.follow_cursor = false;
            let max = app.line_count().saturating_sub(1);
            app.scroll_offset = (app.scroll_offset + WHEEL_STEP).min(max);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ACTIVE_GLYPH, TextBuffer};
    use crate::model::config::Config;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::layout::Rect;
    use std::path::PathBuf;

    fn app_with(text: &str) -> App {
        let mut app = App::new(
            text,
            Config::default(),
            PathBuf::from("/nonexistent/tasks.txt"),
            PathBuf::from("/nonexistent/config.toml"),
        );
        // Gutter occupies columns 0..3, text starts at column 3, row 1
        app.editor_area = Rect::new(3, 1, 40, 10);
        app.gutter_width = 3;
        app
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn gutter_click_cycles_line() {
        let mut app = app_with("Buy milk\nCall bank");
        handle_mouse(&mut app, click(1, 2));
        assert_eq!(app.line(1), "+ Call bank");
        assert_eq!(app.buffer().annotation(1), Some(ACTIVE_GLYPH));
        handle_mouse(&mut app, click(0, 2));
        assert_eq!(app.line(1), "X Call bank");
        assert_eq!(app.buffer().annotation(1), None);
    }

    #[test]
    fn click_below_last_line_is_ignored() {
        let mut app = app_with("Buy milk");
        handle_mouse(&mut app, click(1, 5));
        assert_eq!(app.buffer().text(), "Buy milk");
        assert!(!app.dirty);
    }

    #[test]
    fn text_click_moves_cursor() {
        let mut app = app_with("Buy milk\nCall bank");
        handle_mouse(&mut app, click(3 + 5, 2));
        assert_eq!((app.cursor_line, app.cursor_col), (1, 5));
        assert!(!app.dirty);
    }

    #[test]
    fn wheel_scroll_stops_following_cursor() {
        let text = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut app = app_with(&text);
        let wheel = |kind| MouseEvent {
            kind,
            column: 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, wheel(MouseEventKind::ScrollDown));
        assert_eq!(app.scroll_offset, 3);
        assert!(!app.follow_cursor);
        handle_mouse(&mut app, wheel(MouseEventKind::ScrollUp));
        handle_mouse(&mut app, wheel(MouseEventKind::ScrollUp));
        assert_eq!(app.scroll_offset, 0);
    }
}
