use serde::Serialize;

use crate::model::status::{Status, TaskLine};
use crate::parse::classify::classify;

/// Structured result from `tk check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub warnings: Vec<CheckWarning>,
    pub counts: StatusCounts,
}

/// Something in the document that is probably not what the author meant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// More than one line is active; reminders only use the first
    #[serde(rename = "multiple_active")]
    MultipleActive { lines: Vec<usize> },
    /// An active line with nothing after the marker
    #[serde(rename = "empty_active")]
    EmptyActive { line: usize },
    /// A marker glued to a word, e.g. `Xylophone` reads as closed
    #[serde(rename = "glued_marker")]
    GluedMarker { line: usize, marker: char },
}

/// Number of lines in each status (blank lines are not counted)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub active: usize,
    pub closed: usize,
    pub comment: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: Status) {
        match status {
            Status::Pending => self.pending += 1,
            Status::Active => self.active += 1,
            Status::Closed => self.closed += 1,
            Status::Comment => self.comment += 1,
        }
    }

    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::Active => self.active,
            Status::Closed => self.closed,
            Status::Comment => self.comment,
        }
    }
}

/// Project every non-blank line into a `TaskLine`, keeping its index
pub fn task_lines<S: AsRef<str>>(lines: &[S]) -> Vec<(usize, TaskLine)> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.as_ref().trim().is_empty())
        .map(|(i, l)| (i, TaskLine::from_text(l.as_ref())))
        .collect()
}

/// Count statuses over non-blank lines
pub fn count_statuses<S: AsRef<str>>(lines: &[S]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for line in lines {
        let line = line.as_ref();
        if !line.trim().is_empty() {
            counts.add(classify(line));
        }
    }
    counts
}

/// Inspect a document's lines for marker problems.
pub fn check_lines<S: AsRef<str>>(lines: &[S]) -> CheckResult {
    let mut warnings = Vec::new();
    let mut active = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let status = classify(line);
        if status == Status::Active {
            active.push(idx);
            if crate::parse::strip_marker(line).is_empty() {
                warnings.push(CheckWarning::EmptyActive { line: idx });
            }
        }
        if let Some(marker) = status.marker() {
            let after = &line.trim_start()[marker.len_utf8()..];
            if after.chars().next().is_some_and(|c| c.is_alphanumeric()) {
                warnings.push(CheckWarning::GluedMarker { line: idx, marker });
            }
        }
    }

    if active.len() > 1 {
        warnings.insert(0, CheckWarning::MultipleActive { lines: active });
    }

    CheckResult {
        valid: warnings.is_empty(),
        warnings,
        counts: count_statuses(lines),
    }
}
