pub mod editor_view;
pub mod help_overlay;
pub mod reminder_popup;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::util::text::{display_width, truncate_to_width};

use super::app::App;

/// Main render function: header, editor, status row, then overlays
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | editor | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    editor_view::render_editor(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Overlays (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
    if app.reminder.is_some() {
        reminder_popup::render_reminder_popup(frame, app, chunks[1]);
    }
}

/// Document path with a dirty mark, help hint on the right
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let hint = "F1 help";
    let dirty = if app.dirty { " [+]" } else { "" };
    let path = truncate_to_width(
        &app.document_path.display().to_string(),
        width.saturating_sub(hint.len() + dirty.len() + 2),
    );

    let mut spans = vec![
        Span::styled(
            format!(" {}", path),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(dirty, Style::default().fg(app.theme.highlight).bg(bg)),
    ];
    let used = spans_width(&spans);
    if used + hint.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hint.len()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| display_width(&s.content)).sum()
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
