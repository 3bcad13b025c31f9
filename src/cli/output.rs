use serde::Serialize;

use crate::model::status::{Status, TaskLine};
use crate::ops::check::{CheckResult, CheckWarning};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LineJson {
    /// 1-based line number
    pub line: usize,
    pub status: Status,
    pub body: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct ActiveJson {
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Serialize)]
pub struct ToggleJson {
    pub line: usize,
    pub status: Status,
    pub text: String,
}

#[derive(Serialize)]
pub struct IntervalJson {
    pub interval_mins: u32,
    pub enabled: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn line_to_json(index: usize, text: &str) -> LineJson {
    let task = TaskLine::from_text(text);
    LineJson {
        line: index + 1,
        status: task.status,
        body: task.body,
        text: text.to_string(),
    }
}

/// Parse a status name as typed on the command line
pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::ALL
        .iter()
        .copied()
        .find(|st| st.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            format!(
                "invalid status: {} (expected pending, active, closed, or comment)",
                s
            )
        })
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a line as `  12 [+] body`
pub fn format_line(index: usize, text: &str, number_width: usize) -> String {
    let task = TaskLine::from_text(text);
    let marker = task.status.marker().unwrap_or(' ');
    format!(
        "{:>w$} [{}] {}",
        index + 1,
        marker,
        task.body,
        w = number_width
    )
}

/// Format check results as `Warnings:` lines plus a status summary
pub fn format_check(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    if !result.warnings.is_empty() {
        lines.push("Warnings:".to_string());
        for warn in &result.warnings {
            lines.push(format!("  {}", describe_warning(warn)));
        }
        lines.push(String::new());
    }
    let c = &result.counts;
    lines.push(format!(
        "{} pending, {} active, {} closed, {} comment",
        c.pending, c.active, c.closed, c.comment
    ));
    if result.valid {
        lines.push("ok".to_string());
    }
    lines
}

fn describe_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::MultipleActive { lines } => format!(
            "{} active lines ({}); reminders use the first",
            lines.len(),
            lines
                .iter()
                .map(|l| (l + 1).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        CheckWarning::EmptyActive { line } => {
            format!("line {} is active but has no text", line + 1)
        }
        CheckWarning::GluedMarker { line, marker } => format!(
            "line {} starts with '{}' glued to a word; it reads as a marker",
            line + 1,
            marker
        ),
    }
}
