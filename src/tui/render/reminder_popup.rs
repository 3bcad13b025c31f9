use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::text::display_width;

use super::centered_rect_fixed;

/// Render the focus reminder over the editor
pub fn render_reminder_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(shown) = &app.reminder else {
        return;
    };
    let reminder = &shown.reminder;

    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = Vec::new();
    styled_lines.push((format!(" {}", reminder.title), header_style));
    styled_lines.push((String::new(), text_style));
    for s in wrap_text(" ", &reminder.body, inner_w) {
        styled_lines.push((s, text_style));
    }
    styled_lines.push((String::new(), text_style));
    styled_lines.push((" any key to dismiss".into(), dim_style));

    // Dynamic height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height);

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

/// Word-wrap `text` into lines of at most `max_width` cells.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_w = display_width(indent);
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut current_w = indent_w;

    for word in text.split_whitespace() {
        let word_w = display_width(word);
        let space = if current_w == indent_w { 0 } else { 1 };
        if current_w + space + word_w > max_width && current_w > indent_w {
            lines.push(std::mem::replace(&mut current, indent.to_string()));
            current_w = indent_w;
        }
        if current_w > indent_w {
            current.push(' ');
            current_w += 1;
        }
        current.push_str(word);
        current_w += word_w;
    }
    if current_w > indent_w || lines.is_empty() {
        lines.push(current);
    }
    lines
}
