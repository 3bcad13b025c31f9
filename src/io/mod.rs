pub mod config_io;
pub mod document;
pub mod lock;
pub mod logging;
pub mod state;
pub mod watcher;
