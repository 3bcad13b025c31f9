use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// The document changed on disk.
    Changed(PathBuf),
}

/// Watches a single task document for changes made by other programs.
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DocumentWatcher {
    /// Start watching `document`. The parent directory is watched so atomic
    /// replace-by-rename writes are seen too.
    pub fn start(document: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let file_name: Option<OsString> = document.file_name().map(|n| n.to_os_string());
        let dir = match document.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if let Some(path) = event
                    .paths
                    .into_iter()
                    .find(|p| p.file_name().map(|n| n.to_os_string()) == file_name)
                {
                    let _ = tx.send(FileEvent::Changed(path));
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(DocumentWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}
