//! Output formatting for engine events

pub mod console;
pub mod formatter;
pub mod json;
