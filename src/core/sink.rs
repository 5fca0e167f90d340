//! Sink trait for log output destinations

use super::error::Result;

/// Destination for formatted log text
///
/// A sink receives text that is already formatted, one or more newline
/// terminated lines per call. Sinks are only ever driven behind the owning
/// logger's lock, so implementations need `Send` but not `Sync`.
pub trait Sink: Send {
    fn write(&mut self, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
