//! Log record structure
//!
//! A [`LogRecord`] is assembled once per log call and never mutated after it
//! leaves the producer. Every field is plain owned data, so records move
//! through the async queue without any synchronisation.

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::panic::Location;

// Thread-local cache of the producing thread's display name
thread_local! {
    static THREAD_NAME_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Name of the current thread, falling back to its id when unnamed
fn current_thread_name() -> String {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let thread = std::thread::current();
                match thread.name() {
                    Some(name) => name.to_string(),
                    None => format!("{:?}", thread.id()),
                }
            })
            .clone()
    })
}

/// Call-site descriptor resolved where the log call was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Enclosing function, when the call site could name it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<Cow<'static, str>>,
    pub file: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_path: Option<Cow<'static, str>>,
    pub line: u32,
}

impl Position {
    /// Full position as captured by the logging macros
    pub const fn new(
        function: &'static str,
        file: &'static str,
        module_path: &'static str,
        line: u32,
    ) -> Self {
        Self {
            function: Some(Cow::Borrowed(function)),
            file: Cow::Borrowed(file),
            module_path: Some(Cow::Borrowed(module_path)),
            line,
        }
    }

    /// File and line of the caller of the `#[track_caller]` chain
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            function: None,
            file: Cow::Borrowed(location.file()),
            module_path: None,
            line: location.line(),
        }
    }

    /// Position built from runtime strings, e.g. records bridged from `log`
    pub fn dynamic(
        file: impl Into<Cow<'static, str>>,
        module_path: Option<impl Into<Cow<'static, str>>>,
        line: u32,
    ) -> Self {
        Self {
            function: None,
            file: file.into(),
            module_path: module_path.map(Into::into),
            line,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = &self.function {
            write!(f, "{} ", function)?;
        }
        write!(f, "({}:{})", self.file, self.line)
    }
}

/// Snapshot of an error captured at the log call
///
/// Holds the error's message and its `source()` chain as text, so the record
/// stays `Send + Sync + Clone` regardless of the original error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSnapshot {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorSnapshot {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            causes,
        }
    }
}

impl fmt::Display for ErrorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

/// One log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    #[serde(skip_serializing_if = "LogContext::is_empty")]
    context: LogContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<ErrorSnapshot>,
    position: Position,
    thread_name: String,
    timestamp_millis: i64,
}

impl LogRecord {
    /// Create a record stamped with the current thread and time
    #[track_caller]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::at(level, Position::caller(), message)
    }

    /// Create a record for an explicit call-site position
    pub fn at(level: LogLevel, position: Position, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: LogContext::new(),
            exception: None,
            position,
            thread_name: current_thread_name(),
            timestamp_millis: Utc::now().timestamp_millis(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: ErrorSnapshot) -> Self {
        self.exception = Some(exception);
        self
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn exception(&self) -> Option<&ErrorSnapshot> {
        self.exception.as_ref()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    /// Creation time as a UTC datetime
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_millis)
            .single()
            .unwrap_or_default()
    }
}
