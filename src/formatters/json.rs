//! JSON formatter for structured logging
//!
//! Emits each record as a single-line JSON object (JSONL), suitable for
//! log aggregation tools such as ELK or Loki.

use super::timestamp::TimestampFormat;
use crate::core::{Formatter, LogRecord};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timestamp_format: TimestampFormat,
    include_position: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601,
            include_position: true,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_position(mut self, include_position: bool) -> Self {
        self.include_position = include_position;
        self
    }

    fn timestamp(&self, record: &LogRecord) -> Value {
        match self.timestamp_format {
            TimestampFormat::UnixMillis => Value::from(record.timestamp_millis()),
            TimestampFormat::Unix => Value::from(record.timestamp_millis().div_euclid(1000)),
            _ => Value::String(self.timestamp_format.format_millis(record.timestamp_millis())),
        }
    }

    /// Build the JSON object for a record
    pub fn to_value(&self, record: &LogRecord) -> Value {
        let mut obj = Map::new();
        obj.insert("timestamp".to_string(), self.timestamp(record));
        obj.insert("level".to_string(), Value::from(record.level().to_str()));
        obj.insert("message".to_string(), Value::from(record.message()));
        obj.insert("thread".to_string(), Value::from(record.thread_name()));

        if !record.context().is_empty() {
            let context = record
                .context()
                .fields()
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect::<Map<_, _>>();
            obj.insert("context".to_string(), Value::Object(context));
        }

        if self.include_position {
            let position = serde_json::to_value(record.position()).unwrap_or(Value::Null);
            obj.insert("position".to_string(), position);
        }

        if let Some(exception) = record.exception() {
            let exception = serde_json::to_value(exception).unwrap_or(Value::Null);
            obj.insert("exception".to_string(), exception);
        }

        Value::Object(obj)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        self.to_value(record).to_string()
    }
}
