use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveTime;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use regex::Regex;

use crate::editor::{LineBuffer, Synchronizer, TextBuffer};
use crate::io::config_io;
use crate::io::document::{self, DocumentError};
use crate::io::state::{SessionState, read_session_state, write_session_state};
use crate::io::watcher::{DocumentWatcher, FileEvent};
use crate::model::config::Config;
use crate::model::status::Status;
use crate::ops::reminder::{Reminder, ReminderScheduler};
use crate::parse::classify::indent_len;

use super::input;
use super::render;
use super::theme::Theme;

/// How often a dirty document is written back
const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(1);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Search,
}

/// A reminder currently on screen
#[derive(Debug, Clone)]
pub struct ShownReminder {
    pub reminder: Reminder,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub sync: Synchronizer<LineBuffer>,
    pub config: Config,
    pub document_path: PathBuf,
    pub config_path: PathBuf,
    pub theme: Theme,
    pub mode: Mode,
    pub should_quit: bool,
    /// Cursor line index
    pub cursor_line: usize,
    /// Cursor byte offset within the line
    pub cursor_col: usize,
    /// Display column to aim for on vertical moves
    pub sticky_col: Option<usize>,
    /// First visible line
    pub scroll_offset: usize,
    /// First visible display column
    pub h_scroll: usize,
    /// Scroll so the cursor stays visible; wheel scrolling turns this off
    pub follow_cursor: bool,
    /// Unsaved edits exist
    pub dirty: bool,
    /// Text as last loaded from or written to disk
    pub saved_text: String,
    pub scheduler: ReminderScheduler,
    pub reminder: Option<ShownReminder>,
    /// Transient status-row message
    pub message: Option<String>,
    pub show_help: bool,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern
    pub last_search: Option<String>,
    /// Text area of the editor from the last render (gutter excluded)
    pub editor_area: Rect,
    /// Gutter width from the last render
    pub gutter_width: u16,
}

impl App {
    pub fn new(text: &str, config: Config, document_path: PathBuf, config_path: PathBuf) -> Self {
        let now = Instant::now();
        let sync = Synchronizer::new(LineBuffer::from_text(text))
            .with_glyph(config.editor.active_glyph.clone())
            .with_policy(config.editor.active_policy());
        let scheduler = if config.reminders.enabled {
            ReminderScheduler::new(config.reminders.interval_mins, now)
        } else {
            ReminderScheduler::disabled(config.reminders.interval_mins, now)
        };
        let theme = Theme::from_config(&config.ui);

        App {
            sync,
            config,
            document_path,
            config_path,
            theme,
            mode: Mode::Edit,
            should_quit: false,
            cursor_line: 0,
            cursor_col: 0,
            sticky_col: None,
            scroll_offset: 0,
            h_scroll: 0,
            follow_cursor: true,
            dirty: false,
            saved_text: text.to_string(),
            scheduler,
            reminder: None,
            message: None,
            show_help: false,
            search_input: String::new(),
            last_search: None,
            editor_area: Rect::default(),
            gutter_width: 0,
        }
    }

    pub fn buffer(&self) -> &LineBuffer {
        self.sync.buffer()
    }

    pub fn line_count(&self) -> usize {
        self.sync.buffer().line_count()
    }

    pub fn line(&self, index: usize) -> &str {
        self.sync.buffer().line(index).unwrap_or("")
    }

    pub fn current_line(&self) -> &str {
        self.line(self.cursor_line)
    }

    pub fn active_task(&self) -> Option<String> {
        self.sync.find_active_task()
    }

    /// Keep the cursor on an existing line and a char boundary
    pub fn clamp_cursor(&mut self) {
        self.cursor_line = self.cursor_line.min(self.line_count() - 1);
        let line = self.current_line();
        let mut col = self.cursor_col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor_col = col;
    }

    /// React to a text edit made through the buffer
    pub fn after_edit(&mut self) {
        self.sync.pump();
        self.dirty = true;
        self.clamp_cursor();
    }

    /// Gutter click on `line`: cycle its status. Keeps the cursor on the same
    /// character when the click rewrites the cursor line.
    pub fn gutter_click(&mut self, line: usize) -> Option<Status> {
        let before = self.sync.buffer().line(line)?.len();
        let status = self.sync.on_gutter_click(line)?;
        self.dirty = true;

        if line == self.cursor_line {
            let after = self.current_line().len();
            let indent = indent_len(self.current_line());
            if self.cursor_col > indent {
                self.cursor_col = (self.cursor_col + after)
                    .saturating_sub(before)
                    .max(indent);
            }
        }
        self.clamp_cursor();
        self.message = Some(format!("line {}: {}", line + 1, status.name()));
        Some(status)
    }

    /// Write the buffer to the document file
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let text = self.sync.buffer().text();
        document::save_document(&self.document_path, &text)?;
        self.saved_text = text;
        self.dirty = false;
        Ok(())
    }

    /// Save, turning failures into a status message
    pub fn save_or_report(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "save failed");
            self.message = Some(format!("save failed: {}", e));
        }
    }

    /// Pick up an external change to the document. Our own writes and
    /// changes that would clobber unsaved edits are skipped.
    pub fn reload_from_disk(&mut self) {
        let text = match std::fs::read_to_string(&self.document_path) {
            Ok(t) => t,
            Err(_) => return,
        };
        if text == self.saved_text || text == self.sync.buffer().text() {
            return;
        }
        if self.dirty {
            tracing::warn!("document changed on disk while edits are unsaved");
            self.message = Some("document changed on disk; Ctrl-S keeps your version".into());
            return;
        }
        tracing::info!(path = %self.document_path.display(), "reloading changed document");
        self.sync.buffer_mut().set_text(&text);
        self.sync.pump();
        self.saved_text = text;
        self.clamp_cursor();
        self.message = Some("reloaded from disk".into());
    }

    /// Change the reminder interval and persist it to the config file
    pub fn set_interval(&mut self, mins: u32) {
        self.scheduler.set_interval_mins(mins, Instant::now());
        let mins = self.scheduler.interval_mins();
        self.config.reminders.interval_mins = mins;
        self.message = Some(format!("reminders every {} min", mins));
        if let Err(e) = config_io::persist_interval(&self.config_path, mins) {
            tracing::error!(error = %e, "could not save interval");
            self.message = Some(format!("could not save interval: {}", e));
        }
    }

    pub fn toggle_reminders(&mut self) {
        let enabled = !self.scheduler.is_enabled();
        self.scheduler.set_enabled(enabled, Instant::now());
        self.message = Some(if enabled {
            "reminders on".into()
        } else {
            "reminders off".into()
        });
    }

    /// Advance timers: expire the shown reminder and fire a new one when due
    pub fn tick(&mut self, now: Instant, clock: NaiveTime) {
        let display = Duration::from_secs(self.config.reminders.display_secs);
        if self
            .reminder
            .as_ref()
            .is_some_and(|r| now.duration_since(r.shown_at) >= display)
        {
            self.reminder = None;
        }

        let active = self.active_task();
        if let Some(reminder) = self.scheduler.tick(now, active.as_deref(), clock) {
            self.reminder = Some(ShownReminder {
                reminder,
                shown_at: now,
            });
        }
    }

    /// Compile the search pattern for highlighting.
    /// In Search mode: compiles from current input. In Edit: compiles from last_search.
    pub fn active_search_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Search if !self.search_input.is_empty() => &self.search_input,
            Mode::Edit => self.last_search.as_deref()?,
            _ => return None,
        };
        compile_search(pattern)
    }

    /// Move the cursor to the next match of the last search, wrapping around.
    /// Returns false when nothing matches.
    pub fn find_next_match(&mut self) -> bool {
        let Some(re) = self.last_search.as_deref().and_then(compile_search) else {
            return false;
        };
        let count = self.line_count();
        for step in 0..=count {
            let idx = (self.cursor_line + step) % count;
            let line = self.line(idx);
            // The cursor line is visited twice: after the cursor first, then
            // from its start once the search has wrapped around.
            let from = if step == 0 { self.cursor_col + 1 } else { 0 };
            let hit = re
                .find_iter(line)
                .find(|m| m.start() >= from)
                .map(|m| m.start());
            if let Some(col) = hit {
                self.cursor_line = idx;
                self.cursor_col = col;
                self.sticky_col = None;
                return true;
            }
        }
        false
    }

    pub fn session_state(&self) -> SessionState {
        SessionState {
            cursor_line: self.cursor_line,
            cursor_col: self.cursor_col,
            scroll_offset: self.scroll_offset,
            last_search: self.last_search.clone(),
        }
    }

    pub fn restore_session(&mut self, state: SessionState) {
        self.cursor_line = state.cursor_line;
        self.cursor_col = state.cursor_col;
        self.scroll_offset = state.scroll_offset.min(self.line_count() - 1);
        self.last_search = state.last_search;
        self.clamp_cursor();
    }
}

/// Case-insensitive regex, falling back to a literal match for invalid patterns
pub fn compile_search(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Run the TUI on `document_path`
pub fn run(document_path: &Path, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _doc) = config_io::read_config(config_path)?;
    let text = document::load_document(document_path, &config.editor.initial_text)?;

    let mut app = App::new(
        &text,
        config,
        document_path.to_path_buf(),
        config_path.to_path_buf(),
    );
    if let Some(state) = read_session_state(document_path) {
        app.restore_session(state);
    }

    let watcher = match DocumentWatcher::start(document_path) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable");
            None
        }
    };

    let kitty = app.config.ui.kitty_keyboard != Some(false)
        && supports_keyboard_enhancement().unwrap_or(false);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    if kitty {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Final save, even if the loop failed
    let save_result = if app.dirty { app.save() } else { Ok(()) };
    if let Err(e) = write_session_state(document_path, &app.session_state()) {
        tracing::warn!(error = %e, "could not write session state");
    }

    // Restore terminal
    if kitty {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    save_result?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&DocumentWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_save = Instant::now();
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if let Some(watcher) = watcher {
            for FileEvent::Changed(_) in watcher.poll() {
                app.reload_from_disk();
            }
        }

        app.tick(Instant::now(), chrono::Local::now().time());

        if app.dirty && last_save.elapsed() >= AUTOSAVE_INTERVAL {
            app.save_or_report();
            last_save = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
