use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;
use crate::ops::reminder::clamp_interval;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse config.toml: {0}")]
    EditParseError(#[from] toml_edit::TomlError),
}

/// Config file location: `$XDG_CONFIG_HOME/tickle/config.toml`,
/// falling back to `~/.config`.
pub fn default_config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| crate::io::document::home_dir().join(".config"));
    config_dir.join("tickle").join("config.toml")
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing.
/// A missing file yields defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let config: Config = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, doc.to_string()).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Update `[reminders] interval_mins` in the config document.
/// Returns the value actually stored after clamping.
pub fn set_interval(doc: &mut toml_edit::DocumentMut, mins: u32) -> u32 {
    let mins = clamp_interval(mins);
    if !doc.contains_key("reminders") {
        doc["reminders"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["reminders"]["interval_mins"] = toml_edit::value(i64::from(mins));
    mins
}

/// Read, update and write the reminder interval in one step
pub fn persist_interval(path: &Path, mins: u32) -> Result<u32, ConfigError> {
    let (_config, mut doc) = read_config(path)?;
    let stored = set_interval(&mut doc, mins);
    write_config(path, &doc)?;
    tracing::info!(mins = stored, "saved reminder interval");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r#"# my settings
[reminders]
interval_mins = 5 # every five minutes

[editor]
single_active = true
"#
    }

    #[test]
    fn test_round_trip_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let (config, doc) = read_config(&path).unwrap();
        assert_eq!(config.reminders.interval_mins, 5);
        assert!(config.editor.single_active);
        write_config(&path, &doc).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, sample_config());
    }

    #[test]
    fn missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config.reminders.interval_mins, 1);
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[reminders\n").unwrap();
        assert!(matches!(
            read_config(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_set_interval_keeps_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        assert_eq!(set_interval(&mut doc, 20), 20);
        let result = doc.to_string();
        assert!(result.contains("# my settings"));
        assert!(result.contains("single_active = true"));
        let config: Config = toml::from_str(&result).unwrap();
        assert_eq!(config.reminders.interval_mins, 20);
    }

    #[test]
    fn test_set_interval_creates_table_and_clamps() {
        let mut doc = toml_edit::DocumentMut::new();
        assert_eq!(set_interval(&mut doc, 0), 1);
        let config: Config = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.reminders.interval_mins, 1);
    }

    #[test]
    fn test_persist_interval_creates_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sub").join("config.toml");
        persist_interval(&path, 15).unwrap();
        let (config, _) = read_config(&path).unwrap();
        assert_eq!(config.reminders.interval_mins, 15);
    }
}
