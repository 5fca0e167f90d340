//! Human-readable single-line formatter

use super::timestamp::TimestampFormat;
use crate::core::{Formatter, LogRecord};
#[cfg(feature = "console")]
use colored::Colorize;

/// Formats records as
/// `[timestamp] [LEVEL] thread - message key=value @ function (file:line) | error: ...`
///
/// Messages are sanitised so that embedded newlines cannot forge extra log
/// lines.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    timestamp_format: TimestampFormat,
    use_colors: bool,
    include_position: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour the level with ANSI escapes (requires the `console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Append the call-site position to each line
    #[must_use]
    pub fn with_position(mut self, include_position: bool) -> Self {
        self.include_position = include_position;
        self
    }

    /// Escape line breaks and tabs to prevent log injection
    fn sanitize(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    fn level(&self, record: &LogRecord) -> String {
        let level = format!("{:5}", record.level());
        #[cfg(feature = "console")]
        if self.use_colors {
            return level.color(record.level().color_code()).to_string();
        }
        level
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut line = format!(
            "[{}] [{}] {} - {}",
            self.timestamp_format.format_millis(record.timestamp_millis()),
            self.level(record),
            record.thread_name(),
            Self::sanitize(record.message())
        );

        if !record.context().is_empty() {
            line.push(' ');
            line.push_str(&Self::sanitize(&record.context().format_fields()));
        }

        if self.include_position {
            line.push_str(" @ ");
            line.push_str(&record.position().to_string());
        }

        if let Some(exception) = record.exception() {
            line.push_str(" | error: ");
            line.push_str(&Self::sanitize(&exception.to_string()));
        }

        line
    }
}
