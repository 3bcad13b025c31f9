use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;

use crate::editor::TextBuffer;
use crate::model::status::Status;
use crate::tui::app::{App, Mode};
use crate::util::text::{TAB_WIDTH, col_of_offset, display_width};

/// Digits shown for line numbers, at least two
fn number_width(line_count: usize) -> usize {
    line_count.to_string().len().max(2)
}

/// Gutter layout: marker column, right-aligned line number, one space
fn gutter_width(app: &App) -> u16 {
    let glyph_w = display_width(app.sync.glyph()).max(1);
    (glyph_w + number_width(app.line_count()) + 1) as u16
}

/// Render the document with its marker gutter
pub fn render_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let gutter_w = gutter_width(app).min(area.width);
    let text_area = Rect::new(
        area.x + gutter_w,
        area.y,
        area.width - gutter_w,
        area.height,
    );
    app.editor_area = text_area;
    app.gutter_width = gutter_w;

    scroll_into_view(app, text_area);

    let bg = app.theme.background;
    let glyph = app.sync.glyph().to_string();
    let glyph_w = display_width(&glyph).max(1);
    let num_w = number_width(app.line_count());
    let search_re = app.active_search_re();
    let width = text_area.width as usize;

    let first = app.scroll_offset;
    let last = (first + area.height as usize).min(app.line_count());
    let mut lines: Vec<Line> = Vec::with_capacity(last.saturating_sub(first));

    for idx in first..last {
        let is_cursor_line = idx == app.cursor_line;
        let mut spans: Vec<Span> = Vec::new();

        // Gutter
        let marker = match app.buffer().annotation(idx) {
            Some(g) => format!("{}{}", g, " ".repeat(glyph_w - display_width(g).min(glyph_w))),
            None => " ".repeat(glyph_w),
        };
        spans.push(Span::styled(marker, Style::default().fg(app.theme.red).bg(bg)));
        let number_fg = if is_cursor_line {
            app.theme.text_bright
        } else {
            app.theme.gutter
        };
        spans.push(Span::styled(
            format!("{:>w$} ", idx + 1, w = num_w),
            Style::default().fg(number_fg).bg(bg),
        ));

        // Text
        let text = app.line(idx);
        let status = app.sync.status_of(idx);
        let mut base = Style::default().fg(app.theme.status_color(status)).bg(bg);
        if status == Status::Active {
            base = base.add_modifier(Modifier::BOLD);
        }
        let highlight = Style::default()
            .fg(app.theme.search_match_fg)
            .bg(app.theme.search_match_bg);
        let matches: Vec<Range<usize>> = search_re
            .as_ref()
            .map(|re| re.find_iter(text).map(|m| m.range()).collect())
            .unwrap_or_default();
        push_visible_spans(&mut spans, text, app.h_scroll, width, base, highlight, &matches);

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);

    // Terminal cursor
    if app.mode == Mode::Edit && app.reminder.is_none() && !app.show_help {
        let cursor_x = col_of_offset(app.current_line(), app.cursor_col);
        let visible_row = app.cursor_line >= first && app.cursor_line < last;
        let visible_col = cursor_x >= app.h_scroll && cursor_x < app.h_scroll + width;
        if visible_row && visible_col {
            frame.set_cursor_position(Position::new(
                text_area.x + (cursor_x - app.h_scroll) as u16,
                text_area.y + (app.cursor_line - first) as u16,
            ));
        }
    }
}

/// Adjust the scroll offsets so the cursor is on screen
fn scroll_into_view(app: &mut App, area: Rect) {
    let height = area.height as usize;
    let max_scroll = app.line_count().saturating_sub(1);
    if app.follow_cursor && height > 0 {
        if app.cursor_line < app.scroll_offset {
            app.scroll_offset = app.cursor_line;
        } else if app.cursor_line >= app.scroll_offset + height {
            app.scroll_offset = app.cursor_line + 1 - height;
        }
    }
    app.scroll_offset = app.scroll_offset.min(max_scroll);

    let width = area.width as usize;
    if width > 0 {
        let cursor_x = col_of_offset(app.current_line(), app.cursor_col);
        if cursor_x < app.h_scroll {
            app.h_scroll = cursor_x;
        } else if cursor_x >= app.h_scroll + width {
            app.h_scroll = cursor_x + 1 - width;
        }
    }
}

/// Push spans for the cells `h_scroll..h_scroll + width` of `text`. Bytes
/// inside `matches` get `highlight_style`; tabs are drawn as spaces and
/// graphemes cut by either edge are dropped.
pub(super) fn push_visible_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    h_scroll: usize,
    width: usize,
    base_style: Style,
    highlight_style: Style,
    matches: &[Range<usize>],
) {
    let end_col = h_scroll + width;
    let mut col = 0;
    let mut run = String::new();
    let mut run_highlighted = false;

    for (offset, g) in text.grapheme_indices(true) {
        let w = if g == "\t" { TAB_WIDTH } else { display_width(g) };
        let start = col;
        col += w;
        if start < h_scroll {
            continue;
        }
        if col > end_col {
            break;
        }
        let highlighted = matches.iter().any(|m| m.contains(&offset));
        if highlighted != run_highlighted && !run.is_empty() {
            let style = if run_highlighted { highlight_style } else { base_style };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_highlighted = highlighted;
        if g == "\t" {
            run.push_str(&" ".repeat(TAB_WIDTH));
        } else {
            run.push_str(g);
        }
    }
    if !run.is_empty() {
        let style = if run_highlighted { highlight_style } else { base_style };
        spans.push(Span::styled(run, style));
    }
}
