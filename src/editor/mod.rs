pub mod buffer;
pub mod sync;

pub use buffer::{ChangeEvent, ClickEvent, EditorEvent, LineBuffer, TextBuffer};
pub use sync::{ACTIVE_GLYPH, ActivePolicy, Synchronizer};
