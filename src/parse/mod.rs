pub mod classify;

pub use classify::{classify, indent_len, strip_marker};
