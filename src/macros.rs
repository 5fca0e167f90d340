//! Logging macros for ergonomic log message formatting.
//!
//! The macros check the logger's gate before anything is formatted, and
//! record the full call site: enclosing function, file, module path and line.
//!
//! # Examples
//!
//! ```
//! use batchlog::prelude::*;
//! use batchlog::{error, info};
//!
//! let sink = WriterSink::in_memory();
//! let buffer = sink.buffer();
//! let logger = SyncLogger::new(TextFormatter::new(), sink);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With context fields and an error
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
//! error!(logger, ctx: { "peer" => "10.0.0.7", "attempt" => 3 }, err: &err, "Request failed");
//!
//! assert_eq!(buffer.lines().len(), 3);
//! ```

/// Strip the helper suffixes from a `type_name` used to find the caller
#[doc(hidden)]
pub fn __function_name(raw: &'static str) -> &'static str {
    let mut name = raw.strip_suffix("::__f").unwrap_or(raw);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

/// Call-site [`Position`](crate::core::Position) of the macro invocation
#[doc(hidden)]
#[macro_export]
macro_rules! __position {
    () => {
        $crate::core::Position::new(
            {
                fn __f() {}
                fn __type_name_of<T>(_: T) -> &'static str {
                    ::std::any::type_name::<T>()
                }
                $crate::macros::__function_name(__type_name_of(__f))
            },
            ::std::file!(),
            ::std::module_path!(),
            ::std::line!(),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_impl {
    ($logger:expr, $level:expr, $context:expr, $exception:expr, $($arg:tt)+) => {{
        #[allow(unused_imports)]
        use $crate::core::{Logger as _, LoggerExt as _};
        let __logger = &$logger;
        let __level: $crate::core::LogLevel = $level;
        if __logger.is_enabled(__level) {
            __logger.log_with(
                __level,
                $crate::__position!(),
                || ::std::format!($($arg)+),
                $context,
                $exception,
            );
        }
    }};
}

/// Log a message with automatic formatting.
///
/// Optional `ctx: { key => value, .. }` and `err: &error` arguments come
/// before the format string, in that order.
///
/// # Examples
///
/// ```
/// # use batchlog::prelude::*;
/// # let logger = SyncLogger::new(TextFormatter::new(), WriterSink::in_memory());
/// use batchlog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, ctx: { "user" => 42 }, "Quota at {}%", 90);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, ctx: { $($key:expr => $value:expr),* $(,)? }, err: $err:expr, $($arg:tt)+) => {
        $crate::__log_impl!(
            $logger,
            $level,
            {
                #[allow(unused_mut)]
                let mut __context = $crate::core::LogContext::new();
                $( __context.add_field($key, $value); )*
                __context
            },
            ::std::option::Option::Some($crate::core::ErrorSnapshot::from_error($err)),
            $($arg)+
        )
    };
    ($logger:expr, $level:expr, ctx: { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $crate::__log_impl!(
            $logger,
            $level,
            {
                #[allow(unused_mut)]
                let mut __context = $crate::core::LogContext::new();
                $( __context.add_field($key, $value); )*
                __context
            },
            ::std::option::Option::None,
            $($arg)+
        )
    };
    ($logger:expr, $level:expr, err: $err:expr, $($arg:tt)+) => {
        $crate::__log_impl!(
            $logger,
            $level,
            $crate::core::LogContext::new(),
            ::std::option::Option::Some($crate::core::ErrorSnapshot::from_error($err)),
            $($arg)+
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::__log_impl!(
            $logger,
            $level,
            $crate::core::LogContext::new(),
            ::std::option::Option::None,
            $($arg)+
        )
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use batchlog::prelude::*;
/// # let logger = SyncLogger::new(TextFormatter::new(), WriterSink::in_memory())
/// #     .with_minimum_level(LogLevel::Trace);
/// use batchlog::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use batchlog::prelude::*;
/// # let logger = SyncLogger::new(TextFormatter::new(), WriterSink::in_memory());
/// use batchlog::warn;
/// warn!(logger, "Deprecated API used");
/// warn!(logger, "Memory usage at {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, LogRecord, Logger, Result};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture {
        min_level: LogLevel,
        seen: Arc<Mutex<Vec<LogRecord>>>,
    }

    impl Logger for Capture {
        fn min_level(&self) -> LogLevel {
            self.min_level
        }

        fn dispatch(&self, record: LogRecord) {
            self.seen.lock().push(record);
        }

        fn submit_one(&self, record: LogRecord) -> Result<()> {
            self.dispatch(record);
            Ok(())
        }

        fn with_minimum_level(&self, level: LogLevel) -> Self {
            Self {
                min_level: level,
                seen: Arc::clone(&self.seen),
            }
        }
    }

    struct Counted<'a>(&'a AtomicUsize);

    impl std::fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            write!(f, "counted")
        }
    }

    #[test]
    fn test_function_name_trimming() {
        assert_eq!(super::__function_name("app::run::__f"), "app::run");
        assert_eq!(
            super::__function_name("app::run::{{closure}}::{{closure}}::__f"),
            "app::run"
        );
    }

    #[test]
    fn test_macro_captures_position() {
        let logger = Capture::default();
        let line = line!() + 1;
        info!(logger, "value {}", 7);

        let seen = logger.seen.lock();
        let position = seen[0].position();
        assert_eq!(seen[0].message(), "value 7");
        assert_eq!(position.line, line);
        assert!(position.file.ends_with("macros.rs"));
        assert_eq!(position.module_path.as_deref(), Some(module_path!()));
        assert!(position
            .function
            .as_deref()
            .is_some_and(|f| f.ends_with("test_macro_captures_position")));
    }

    #[test]
    fn test_arguments_not_formatted_when_filtered() {
        let logger = Capture::default();
        let formats = AtomicUsize::new(0);

        debug!(logger, "{}", Counted(&formats));
        assert_eq!(formats.load(Ordering::SeqCst), 0);

        warn!(logger, "{}", Counted(&formats));
        assert_eq!(formats.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_and_error_arguments() {
        let logger = Capture::default();
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline exceeded");

        error!(logger, ctx: { "request_id" => "abc", "attempt" => 2 }, err: &err, "call failed");
        warn!(logger, ctx: { "shard" => 4, }, "rebalancing");
        error!(logger, err: &err, "no context");

        let seen = logger.seen.lock();
        assert_eq!(seen[0].context().get("request_id"), Some("abc"));
        assert_eq!(seen[0].context().get("attempt"), Some("2"));
        assert_eq!(seen[0].exception().unwrap().message, "deadline exceeded");
        assert_eq!(seen[1].context().get("shard"), Some("4"));
        assert!(seen[1].exception().is_none());
        assert!(seen[2].context().is_empty());
        assert!(seen[2].exception().is_some());
    }

    #[test]
    fn test_works_through_references_and_arcs() {
        let logger = Arc::new(Capture::default());
        let by_ref = &logger;
        info!(by_ref, "via ref");
        log!(logger, LogLevel::Error, "via arc");
        assert_eq!(logger.seen.lock().len(), 2);
    }
}
