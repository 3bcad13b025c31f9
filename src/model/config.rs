use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::editor::sync::{ACTIVE_GLYPH, ActivePolicy};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minutes between reminders (minimum 1)
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u32,
    /// How long a reminder stays on screen
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            enabled: true,
            interval_mins: default_interval_mins(),
            display_secs: default_display_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Activating a task demotes any other active task
    #[serde(default)]
    pub single_active: bool,
    /// Text of a brand new document
    #[serde(default = "default_initial_text")]
    pub initial_text: String,
    /// Gutter glyph shown next to the active task
    #[serde(default = "default_active_glyph")]
    pub active_glyph: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            single_active: false,
            initial_text: default_initial_text(),
            active_glyph: default_active_glyph(),
        }
    }
}

impl EditorConfig {
    pub fn active_policy(&self) -> ActivePolicy {
        if self.single_active {
            ActivePolicy::Exclusive
        } else {
            ActivePolicy::Tolerate
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Kitty keyboard protocol: true = force on, false = force off, absent = on (default).
    #[serde(default)]
    pub kitty_keyboard: Option<bool>,
}

fn default_true() -> bool {
    true
}

fn default_interval_mins() -> u32 {
    1
}

fn default_display_secs() -> u64 {
    10
}

fn default_initial_text() -> String {
    "Enter Tasks Here".to_string()
}

fn default_active_glyph() -> String {
    ACTIVE_GLYPH.to_string()
}
