use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::config::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 12;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App over `text` with default config and paths that are never touched.
pub fn app_with_text(text: &str) -> App {
    App::new(
        text,
        Config::default(),
        PathBuf::from("/tmp/tickle-test/tasks.txt"),
        PathBuf::from("/tmp/tickle-test/config.toml"),
    )
}

/// A short list with one line in each status.
pub const SAMPLE_TEXT: &str = "\
# errands
Buy milk
+ Call bank
X Pay rent";
