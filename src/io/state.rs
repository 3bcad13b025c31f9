use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted editor session state, stored beside the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionState {
    /// Cursor line
    #[serde(default)]
    pub cursor_line: usize,
    /// Cursor column (byte offset into the line)
    #[serde(default)]
    pub cursor_col: usize,
    /// First visible line
    #[serde(default)]
    pub scroll_offset: usize,
    /// Last search pattern
    #[serde(default)]
    pub last_search: Option<String>,
}

/// `notes/.tasks.txt.state.json` for `notes/tasks.txt`
pub fn state_path(document: &Path) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tasks".to_string());
    document
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!(".{}.state.json", name))
}

/// Read the session state for a document. Missing or malformed files are ignored.
pub fn read_session_state(document: &Path) -> Option<SessionState> {
    let content = fs::read_to_string(state_path(document)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the session state for a document
pub fn write_session_state(document: &Path, state: &SessionState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(state_path(document), content)
}
