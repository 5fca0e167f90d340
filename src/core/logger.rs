//! Logger contract shared by every backend

use super::{
    error::{LoggerError, Result},
    log_context::LogContext,
    log_level::LogLevel,
    log_record::{ErrorSnapshot, LogRecord, Position},
};
use std::sync::Arc;

/// Callback for overflow notifications
///
/// Called when records are dropped because the async queue is full.
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Callback for failures the pipeline swallows instead of raising
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Capability interface implemented by every logger backend
///
/// Logger values are immutable configuration snapshots: changing the gate
/// with [`Logger::with_minimum_level`] yields a new value that shares the
/// same underlying sink or queue.
///
/// The trait is object-safe, so `&dyn Logger`, `Box<dyn Logger>` and
/// `Arc<dyn Logger>` support every [`LoggerExt`] helper. Wrappers that are
/// generic over their backend, such as `AsyncLogger`, need a sized logger; put
/// a type-erased backend behind a `CompositeLogger` to wrap it.
pub trait Logger: Send + Sync {
    /// Lowest level this logger value lets through
    fn min_level(&self) -> LogLevel;

    #[inline]
    fn is_enabled(&self, level: LogLevel) -> bool {
        level.passes(self.min_level())
    }

    /// Route a record that has already passed this logger's level gate
    ///
    /// Never raises; failures go to the logger's error hook.
    fn dispatch(&self, record: LogRecord);

    /// Submit a single record, bypassing the level gate
    fn submit_one(&self, record: LogRecord) -> Result<()>;

    /// Submit records as one unit, preserving their order
    fn submit_batch(&self, records: Vec<LogRecord>) -> Result<()> {
        for record in records {
            self.submit_one(record)?;
        }
        Ok(())
    }

    /// Push records this logger is holding on to their destination
    ///
    /// Never raises; failures go to the logger's error hook.
    fn flush(&self) {}

    /// A new logger sharing this one's resource with a different gate
    fn with_minimum_level(&self, level: LogLevel) -> Self
    where
        Self: Sized;
}

/// Producer-facing helpers available on every [`Logger`]
///
/// The message is passed as a closure so that disabled log lines never pay
/// for building their string. The closure runs at most once, after the gate.
pub trait LoggerExt: Logger {
    /// Log at `level`, recording the caller's file and line
    #[track_caller]
    fn log<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(LogRecord::at(level, Position::caller(), message()));
    }

    /// Log with every record field supplied explicitly
    fn log_with<F>(
        &self,
        level: LogLevel,
        position: Position,
        message: F,
        context: LogContext,
        exception: Option<ErrorSnapshot>,
    ) where
        F: FnOnce() -> String,
    {
        if !self.is_enabled(level) {
            return;
        }
        let mut record = LogRecord::at(level, position, message()).with_context(context);
        if let Some(exception) = exception {
            record = record.with_exception(exception);
        }
        self.dispatch(record);
    }

    /// Log an error value with its source chain
    #[track_caller]
    fn log_error<F>(&self, level: LogLevel, message: F, error: &(dyn std::error::Error + 'static))
    where
        F: FnOnce() -> String,
    {
        if !self.is_enabled(level) {
            return;
        }
        let record = LogRecord::at(level, Position::caller(), message())
            .with_exception(ErrorSnapshot::from_error(error));
        self.dispatch(record);
    }

    #[inline]
    #[track_caller]
    fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, || message.into());
    }

    #[inline]
    #[track_caller]
    fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, || message.into());
    }

    #[inline]
    #[track_caller]
    fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, || message.into());
    }

    #[inline]
    #[track_caller]
    fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, || message.into());
    }

    #[inline]
    #[track_caller]
    fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, || message.into());
    }

    /// Log with structured context fields
    #[track_caller]
    fn log_with_context(&self, level: LogLevel, message: impl Into<String>, context: LogContext) {
        self.log_with(level, Position::caller(), || message.into(), context, None);
    }
}

impl<L: Logger + ?Sized> LoggerExt for L {}

/// Deliver a swallowed failure to the hook, or to stderr when none is set
pub(crate) fn report_error(hook: Option<&ErrorCallback>, error: &LoggerError) {
    match hook {
        Some(hook) => hook(error),
        None => eprintln!("[LOGGER ERROR] {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recording {
        min_level: LogLevel,
        seen: Arc<Mutex<Vec<LogRecord>>>,
    }

    impl Logger for Recording {
        fn min_level(&self) -> LogLevel {
            self.min_level
        }

        fn dispatch(&self, record: LogRecord) {
            let _ = self.submit_one(record);
        }

        fn submit_one(&self, record: LogRecord) -> Result<()> {
            self.seen.lock().push(record);
            Ok(())
        }

        fn with_minimum_level(&self, level: LogLevel) -> Self {
            Self {
                min_level: level,
                seen: Arc::clone(&self.seen),
            }
        }
    }

    #[test]
    fn test_filtered_message_is_never_built() {
        let logger = Recording::default().with_minimum_level(LogLevel::Warn);
        let evaluations = AtomicUsize::new(0);

        logger.log(LogLevel::Debug, || {
            evaluations.fetch_add(1, Ordering::SeqCst);
            "expensive".to_string()
        });
        assert_eq!(evaluations.load(Ordering::SeqCst), 0);
        assert!(logger.seen.lock().is_empty());

        logger.log(LogLevel::Error, || {
            evaluations.fetch_add(1, Ordering::SeqCst);
            "kept".to_string()
        });
        assert_eq!(evaluations.load(Ordering::SeqCst), 1);
        assert_eq!(logger.seen.lock()[0].message(), "kept");
    }

    #[test]
    fn test_with_minimum_level_shares_resource() {
        let base = Recording::default();
        let strict = base.with_minimum_level(LogLevel::Error);

        base.info("through base");
        strict.info("filtered by strict");
        strict.error("through strict");

        let seen = base.seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].message(), "through strict");
    }

    #[test]
    fn test_default_submit_batch_preserves_order() {
        let logger = Recording::default();
        let batch = ["a", "b", "c"]
            .iter()
            .map(|m| LogRecord::new(LogLevel::Info, *m))
            .collect();
        logger.submit_batch(batch).unwrap();

        let messages: Vec<_> = logger
            .seen
            .lock()
            .iter()
            .map(|r| r.message().to_string())
            .collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_log_error_captures_chain() {
        let logger = Recording::default();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        logger.log_error(LogLevel::Error, || "send failed".to_string(), &err);

        let seen = logger.seen.lock();
        assert_eq!(seen[0].exception().unwrap().message, "socket closed");
    }

    #[test]
    fn test_trait_object_usage() {
        let logger: Box<dyn Logger> = Box::new(Recording::default());
        logger.warn("through dyn");
        assert!(logger.is_enabled(LogLevel::Warn));
    }
}
