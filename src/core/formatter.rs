//! Formatter trait turning a record into text

use super::log_record::LogRecord;

/// Renders one record as a single line of text, without the trailing newline
///
/// Implementations must be pure and total: the same record and configuration
/// always yield the same text, and formatting never fails.
///
/// # Example
///
/// ```
/// use batchlog::core::{Formatter, LogLevel, LogRecord};
///
/// let formatter = |record: &LogRecord| format!("{} {}", record.level(), record.message());
/// let record = LogRecord::new(LogLevel::Warn, "disk almost full");
/// assert_eq!(formatter.format(&record), "WARN disk almost full");
/// ```
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&LogRecord) -> String + Send + Sync,
{
    fn format(&self, record: &LogRecord) -> String {
        self(record)
    }
}
