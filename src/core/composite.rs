//! Fan-out and no-op backends

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    logger::{report_error, ErrorCallback, Logger},
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Logger that discards every record
///
/// [`Logger::is_enabled`] is always false, so callers never build messages
/// for it.
#[derive(Debug, Clone, Copy)]
pub struct NoopLogger {
    min_level: LogLevel,
}

impl NoopLogger {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Error,
        }
    }
}

impl Default for NoopLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for NoopLogger {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn dispatch(&self, _record: LogRecord) {}

    fn submit_one(&self, _record: LogRecord) -> Result<()> {
        Ok(())
    }

    fn submit_batch(&self, _records: Vec<LogRecord>) -> Result<()> {
        Ok(())
    }

    fn with_minimum_level(&self, level: LogLevel) -> Self {
        Self { min_level: level }
    }
}

/// Logger that forwards each record to several children
///
/// Each child applies its own gate to every record, on the dispatch and the
/// batch path alike. A child that fails or panics does not prevent delivery
/// to the others.
///
/// # Example
///
/// ```
/// use batchlog::prelude::*;
/// use std::sync::Arc;
///
/// let audit = WriterSink::in_memory();
/// let audit_buf = audit.buffer();
///
/// let children: Vec<Arc<dyn Logger>> = vec![
///     Arc::new(SyncLogger::new(TextFormatter::new(), ConsoleSink::stderr())),
///     Arc::new(SyncLogger::new(JsonFormatter::new(), audit).with_minimum_level(LogLevel::Error)),
/// ];
/// let logger = CompositeLogger::new(children);
///
/// logger.warn("only on stderr");
/// logger.error("on both");
/// assert_eq!(audit_buf.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct CompositeLogger {
    min_level: LogLevel,
    children: Arc<[Arc<dyn Logger>]>,
    on_error: Option<ErrorCallback>,
}

impl CompositeLogger {
    /// Fan out to `children`; the composite's own gate starts at `Trace`
    pub fn new(children: Vec<Arc<dyn Logger>>) -> Self {
        Self {
            min_level: LogLevel::Trace,
            children: children.into(),
            on_error: None,
        }
    }

    /// Hook for child failures on the `dispatch` path
    #[must_use]
    pub fn with_error_hook(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Run `f` for every child, returning the first failure after all have run
    fn for_each_child<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&dyn Logger) -> Result<()>,
    {
        let mut first_error = None;
        for (index, child) in self.children.iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| f(child.as_ref())));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(payload) => {
                    LoggerError::panicked(format!("child logger #{}", index), payload.as_ref())
                }
            };
            if first_error.is_none() {
                first_error = Some(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Logger for CompositeLogger {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn dispatch(&self, record: LogRecord) {
        let result = self.for_each_child(|child| {
            if child.is_enabled(record.level()) {
                child.dispatch(record.clone());
            }
            Ok(())
        });
        if let Err(e) = result {
            report_error(self.on_error.as_ref(), &e);
        }
    }

    fn submit_one(&self, record: LogRecord) -> Result<()> {
        self.for_each_child(|child| {
            if child.is_enabled(record.level()) {
                child.submit_one(record.clone())
            } else {
                Ok(())
            }
        })
    }

    /// Each child receives the records that pass its own gate, in order
    fn submit_batch(&self, records: Vec<LogRecord>) -> Result<()> {
        self.for_each_child(|child| {
            let accepted: Vec<LogRecord> = records
                .iter()
                .filter(|r| child.is_enabled(r.level()))
                .cloned()
                .collect();
            if accepted.is_empty() {
                return Ok(());
            }
            child.submit_batch(accepted)
        })
    }

    fn flush(&self) {
        let result = self.for_each_child(|child| {
            child.flush();
            Ok(())
        });
        if let Err(e) = result {
            report_error(self.on_error.as_ref(), &e);
        }
    }

    fn with_minimum_level(&self, level: LogLevel) -> Self {
        Self {
            min_level: level,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerExt;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Child {
        min_level: LogLevel,
        seen: Arc<Mutex<Vec<String>>>,
        mode: Mode,
    }

    #[derive(Clone, Copy)]
    enum Mode {
        Ok,
        Fail,
        Panic,
    }

    impl Child {
        fn new(mode: Mode) -> (Arc<dyn Logger>, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let child = Child {
                min_level: LogLevel::Trace,
                seen: Arc::clone(&seen),
                mode,
            };
            (Arc::new(child), seen)
        }
    }

    impl Logger for Child {
        fn min_level(&self) -> LogLevel {
            self.min_level
        }

        fn dispatch(&self, record: LogRecord) {
            let _ = self.submit_one(record);
        }

        fn submit_one(&self, record: LogRecord) -> Result<()> {
            match self.mode {
                Mode::Ok => {
                    self.seen.lock().push(record.message().to_string());
                    Ok(())
                }
                Mode::Fail => Err(LoggerError::sink("child", "unavailable")),
                Mode::Panic => panic!("child exploded"),
            }
        }

        fn flush(&self) {
            match self.mode {
                Mode::Panic => panic!("flush exploded"),
                _ => self.seen.lock().push("<flush>".to_string()),
            }
        }

        fn with_minimum_level(&self, level: LogLevel) -> Self {
            Self {
                min_level: level,
                seen: Arc::clone(&self.seen),
                mode: self.mode,
            }
        }
    }

    #[test]
    fn test_noop_discards() {
        let logger = NoopLogger::new();
        assert!(!logger.is_enabled(LogLevel::Error));
        logger.error("nowhere");
        assert!(logger.submit_one(LogRecord::new(LogLevel::Error, "x")).is_ok());
    }

    #[test]
    fn test_fan_out_reaches_every_child() {
        let (a, seen_a) = Child::new(Mode::Ok);
        let (b, seen_b) = Child::new(Mode::Ok);
        let logger = CompositeLogger::new(vec![a, b]);

        logger.info("hello");
        assert_eq!(*seen_a.lock(), vec!["hello"]);
        assert_eq!(*seen_b.lock(), vec!["hello"]);
    }

    #[test]
    fn test_failing_and_panicking_children_are_isolated() {
        let (failing, _) = Child::new(Mode::Fail);
        let (panicking, _) = Child::new(Mode::Panic);
        let (healthy, seen) = Child::new(Mode::Ok);
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);

        let logger = CompositeLogger::new(vec![failing, panicking, healthy]).with_error_hook(
            Arc::new(move |_: &LoggerError| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let err = logger
            .submit_batch(vec![LogRecord::new(LogLevel::Info, "batch")])
            .unwrap_err();
        assert!(matches!(err, LoggerError::SinkError { .. }));
        assert_eq!(*seen.lock(), vec!["batch"]);

        // dispatch path swallows child panics too
        logger.info("dispatched");
        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_flush_reaches_every_child() {
        let (panicking, _) = Child::new(Mode::Panic);
        let (first, seen_first) = Child::new(Mode::Ok);
        let (second, seen_second) = Child::new(Mode::Fail);
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);

        let logger = CompositeLogger::new(vec![first, panicking, second]).with_error_hook(
            Arc::new(move |_: &LoggerError| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        logger.flush();
        assert_eq!(*seen_first.lock(), vec!["<flush>"]);
        assert_eq!(*seen_second.lock(), vec!["<flush>"]);
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_type_erased_backend_behind_async() {
        use crate::core::AsyncLogger;
        use std::time::Duration;

        let (child, seen) = Child::new(Mode::Ok);
        let erased: Arc<dyn Logger> = child;
        erased.info("direct");

        let logger = AsyncLogger::builder()
            .flush_interval(Duration::from_secs(3600))
            .build(CompositeLogger::new(vec![Arc::clone(&erased)]))
            .unwrap();
        logger.info("queued");
        logger.drain();
        logger.shutdown();

        assert_eq!(*seen.lock(), vec!["direct", "queued", "<flush>"]);
    }

    #[test]
    fn test_batch_respects_child_gates() {
        let (verbose, seen_verbose) = Child::new(Mode::Ok);
        let seen_strict = Arc::new(Mutex::new(Vec::new()));
        let strict: Arc<dyn Logger> = Arc::new(Child {
            min_level: LogLevel::Error,
            seen: Arc::clone(&seen_strict),
            mode: Mode::Ok,
        });
        let logger = CompositeLogger::new(vec![verbose, strict]);

        let batch = vec![
            LogRecord::new(LogLevel::Debug, "detail"),
            LogRecord::new(LogLevel::Error, "failure"),
        ];
        logger.submit_batch(batch).unwrap();

        assert_eq!(*seen_verbose.lock(), vec!["detail", "failure"]);
        assert_eq!(*seen_strict.lock(), vec!["failure"]);
    }

    #[test]
    fn test_composite_gate_applies_before_children() {
        let (child, seen) = Child::new(Mode::Ok);
        let logger = CompositeLogger::new(vec![child]).with_minimum_level(LogLevel::Warn);

        logger.info("filtered");
        logger.warn("kept");
        assert_eq!(*seen.lock(), vec!["kept"]);
    }
}
