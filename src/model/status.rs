use serde::{Deserialize, Serialize};

/// Status of a task line, derived from its leading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Active,
    Closed,
    Comment,
}

impl Status {
    /// All statuses, in display order
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Active,
        Status::Closed,
        Status::Comment,
    ];

    /// The leading marker character, if this status has one
    pub fn marker(self) -> Option<char> {
        match self {
            Status::Pending => None,
            Status::Active => Some('+'),
            Status::Closed => Some('X'),
            Status::Comment => Some('#'),
        }
    }

    /// Parse a marker character into a status
    pub fn from_marker(c: char) -> Option<Status> {
        match c {
            '+' => Some(Status::Active),
            'X' => Some(Status::Closed),
            '#' => Some(Status::Comment),
            _ => None,
        }
    }

    /// Lowercase name used by the CLI and JSON output
    pub fn name(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Active => "active",
            Status::Closed => "closed",
            Status::Comment => "comment",
        }
    }

    /// Whether a gutter click moves this status through the cycle
    pub fn is_cyclable(self) -> bool {
        self != Status::Comment
    }
}

/// A single line of the buffer viewed as a task.
///
/// Nothing here is stored: both fields are recomputed from the raw text
/// every time a `TaskLine` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskLine {
    pub status: Status,
    /// Line text without indentation, marker, or the whitespace after the marker
    pub body: String,
}

impl TaskLine {
    pub fn from_text(text: &str) -> Self {
        TaskLine {
            status: crate::parse::classify(text),
            body: crate::parse::strip_marker(text).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_round_trips_through_from_marker() {
        for status in Status::ALL {
            if let Some(c) = status.marker() {
                assert_eq!(Status::from_marker(c), Some(status));
            }
        }
        assert_eq!(Status::from_marker('x'), None);
        assert_eq!(Status::from_marker('-'), None);
    }

    #[test]
    fn only_comment_is_excluded_from_cycle() {
        assert!(Status::Pending.is_cyclable());
        assert!(Status::Active.is_cyclable());
        assert!(Status::Closed.is_cyclable());
        assert!(!Status::Comment.is_cyclable());
    }

    #[test]
    fn task_line_projection() {
        let line = TaskLine::from_text("  X  Pay rent");
        assert_eq!(line.status, Status::Closed);
        assert_eq!(line.body, "Pay rent");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }
}
