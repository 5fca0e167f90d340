//! Sink implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod writer;

pub use console::{ConsoleSink, ConsoleTarget};
#[cfg(feature = "file")]
pub use file::FileSink;
pub use writer::{SharedBuffer, WriterSink};

pub use crate::core::Sink;
