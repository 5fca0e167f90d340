//! Formatter implementations

pub mod json;
pub mod text;
pub mod timestamp;

pub use json::JsonFormatter;
pub use text::TextFormatter;
pub use timestamp::TimestampFormat;

pub use crate::core::Formatter;
