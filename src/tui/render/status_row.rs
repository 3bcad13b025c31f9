use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::text::{display_width, truncate_to_width};

use super::spans_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, right) = match app.mode {
        Mode::Search => {
            // Search prompt: /pattern▌
            let spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            let hint = Span::styled(
                "Enter search  Esc cancel",
                Style::default().fg(app.theme.dim).bg(bg),
            );
            (spans, vec![hint])
        }
        Mode::Edit => {
            let left = if let Some(msg) = &app.message {
                Span::styled(msg.clone(), Style::default().fg(app.theme.text_bright).bg(bg))
            } else if let Some(pattern) = &app.last_search {
                Span::styled(format!("/{}", pattern), Style::default().fg(app.theme.dim).bg(bg))
            } else {
                Span::styled("", Style::default().bg(bg))
            };
            (vec![left], focus_spans(app, width / 2))
        }
    };

    let used = spans_width(&spans);
    let right_width = spans_width(&right);
    if used + right_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - right_width),
            Style::default().bg(bg),
        ));
        spans.extend(right);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Right side in edit mode: the current task and the reminder schedule
fn focus_spans(app: &App, max_width: usize) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let schedule = if app.scheduler.is_enabled() {
        format!("  every {} min", app.scheduler.interval_mins())
    } else {
        "  reminders off".to_string()
    };

    let task = app
        .active_task()
        .filter(|t| !t.trim().is_empty());
    let Some(task) = task else {
        return vec![Span::styled(format!("no active task{}", schedule), dim)];
    };

    let glyph = app.sync.glyph().to_string();
    let room = max_width
        .saturating_sub(display_width(&schedule))
        .saturating_sub(display_width(&glyph) + 1);
    vec![
        Span::styled(format!("{} ", glyph), Style::default().fg(app.theme.red).bg(bg)),
        Span::styled(
            truncate_to_width(&task, room),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled(schedule, dim),
    ]
}
