pub mod config;
pub mod status;

pub use config::*;
pub use status::*;
