//! Synchronous logger: format and write on the calling thread

use super::{
    error::Result,
    formatter::Formatter,
    log_level::LogLevel,
    log_record::LogRecord,
    logger::{report_error, ErrorCallback, Logger},
    metrics::LoggerMetrics,
    sink::Sink,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Leaf logger that talks to a formatter and a sink
///
/// Clones share the same sink, formatter and metrics. Sink errors from
/// [`Logger::submit_one`] and [`Logger::submit_batch`] are returned to the
/// caller; on the fire-and-forget [`Logger::dispatch`] path they are counted
/// and handed to the error hook.
#[derive(Clone)]
pub struct SyncLogger {
    min_level: LogLevel,
    formatter: Arc<dyn Formatter>,
    sink: Arc<Mutex<Box<dyn Sink>>>,
    metrics: Arc<LoggerMetrics>,
    on_error: Option<ErrorCallback>,
}

impl SyncLogger {
    #[must_use]
    pub fn new(formatter: impl Formatter + 'static, sink: impl Sink + 'static) -> Self {
        Self {
            min_level: LogLevel::Info,
            formatter: Arc::new(formatter),
            sink: Arc::new(Mutex::new(Box::new(sink))),
            metrics: Arc::new(LoggerMetrics::new()),
            on_error: None,
        }
    }

    #[must_use]
    pub fn builder() -> SyncLoggerBuilder {
        SyncLoggerBuilder::new()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Name of the underlying sink
    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }

    /// Flush the sink, returning its error
    pub fn flush_sink(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    /// Whether `other` writes through the same sink
    pub fn shares_sink_with(&self, other: &SyncLogger) -> bool {
        Arc::ptr_eq(&self.sink, &other.sink)
    }

    fn render(&self, record: &LogRecord, out: &mut String) {
        out.push_str(&self.formatter.format(record));
        out.push('\n');
    }
}

impl Logger for SyncLogger {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn dispatch(&self, record: LogRecord) {
        match self.submit_one(record) {
            Ok(()) => {
                self.metrics.record_enqueued();
            }
            Err(e) => {
                self.metrics.record_dropped();
                report_error(self.on_error.as_ref(), &e);
            }
        }
    }

    fn submit_one(&self, record: LogRecord) -> Result<()> {
        let mut text = String::new();
        self.render(&record, &mut text);

        let mut sink = self.sink.lock();
        sink.write(&text)?;
        sink.flush()
    }

    /// One write call for the whole batch, in input order
    fn submit_batch(&self, records: Vec<LogRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut text = String::with_capacity(records.len() * 96);
        for record in &records {
            self.render(record, &mut text);
        }

        let mut sink = self.sink.lock();
        sink.write(&text)?;
        sink.flush()
    }

    fn flush(&self) {
        if let Err(e) = self.flush_sink() {
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

/// Builder for [`SyncLogger`]
///
/// # Example
/// ```
/// use batchlog::prelude::*;
///
/// let logger = SyncLogger::builder()
///     .min_level(LogLevel::Debug)
///     .formatter(JsonFormatter::new())
///     .sink(ConsoleSink::stderr())
///     .build();
/// assert_eq!(logger.min_level(), LogLevel::Debug);
/// ```
pub struct SyncLoggerBuilder {
    min_level: LogLevel,
    formatter: Option<Arc<dyn Formatter>>,
    sink: Option<Box<dyn Sink>>,
    on_error: Option<ErrorCallback>,
}

impl SyncLoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            formatter: None,
            sink: None,
            on_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Hook for write failures on the `dispatch` path
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Defaults to a [`TextFormatter`](crate::formatters::TextFormatter)
    /// writing to stdout
    pub fn build(self) -> SyncLogger {
        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(crate::formatters::TextFormatter::new()));
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(crate::sinks::ConsoleSink::stdout()));

        SyncLogger {
            min_level: self.min_level,
            formatter,
            sink: Arc::new(Mutex::new(sink)),
            metrics: Arc::new(LoggerMetrics::new()),
            on_error: self.on_error,
        }
    }
}

impl Default for SyncLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerError, LoggerExt};
    use crate::formatters::TextFormatter;
    use crate::sinks::WriterSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn plain(record: &LogRecord) -> String {
        format!("{}:{}", record.level(), record.message())
    }

    struct CountingSink {
        writes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Sink for CountingSink {
        fn write(&mut self, _text: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LoggerError::sink("counting", "disk full"))
            } else {
                Ok(())
            }
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_writes_immediately() {
        let sink = WriterSink::in_memory();
        let buffer = sink.buffer();
        let logger = SyncLogger::new(plain, sink).with_minimum_level(LogLevel::Debug);

        logger.debug("first");
        logger.trace("filtered");
        logger.warn("second");

        assert_eq!(buffer.contents(), "DEBUG:first\nWARN:second\n");
        assert_eq!(logger.metrics().total_enqueued(), 2);
    }

    #[test]
    fn test_batch_is_a_single_write() {
        let writes = Arc::new(AtomicUsize::new(0));
        let logger = SyncLogger::new(
            plain,
            CountingSink {
                writes: Arc::clone(&writes),
                fail: false,
            },
        );

        let batch = (0..5)
            .map(|i| LogRecord::new(LogLevel::Info, format!("m{}", i)))
            .collect();
        logger.submit_batch(batch).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        logger.submit_batch(Vec::new()).unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_errors_propagate_from_submit() {
        let logger = SyncLogger::new(
            plain,
            CountingSink {
                writes: Arc::new(AtomicUsize::new(0)),
                fail: true,
            },
        );

        let err = logger
            .submit_one(LogRecord::new(LogLevel::Error, "boom"))
            .unwrap_err();
        assert!(matches!(err, LoggerError::SinkError { .. }));
        assert!(logger
            .submit_batch(vec![LogRecord::new(LogLevel::Error, "boom")])
            .is_err());
    }

    #[test]
    fn test_dispatch_reports_instead_of_raising() {
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);

        let logger = SyncLogger::builder()
            .formatter(plain)
            .sink(CountingSink {
                writes: Arc::new(AtomicUsize::new(0)),
                fail: true,
            })
            .on_error(Arc::new(move |_: &LoggerError| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .build();

        logger.error("never written");
        assert_eq!(reported.load(Ordering::SeqCst), 1);
        assert_eq!(logger.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_invalid_timestamp_pattern_still_writes() {
        let sink = WriterSink::in_memory();
        let buffer = sink.buffer();
        let logger = SyncLogger::new(TextFormatter::new().with_custom_timestamp("%Q"), sink);

        logger.info("hello");
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" - hello"));
    }

    #[test]
    fn test_flush_reports_sink_errors() {
        struct FlushFails;

        impl Sink for FlushFails {
            fn write(&mut self, _text: &str) -> Result<()> {
                Ok(())
            }

            fn flush(&mut self) -> Result<()> {
                Err(LoggerError::sink("flaky", "device gone"))
            }

            fn name(&self) -> &str {
                "flaky"
            }
        }

        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        let logger = SyncLogger::builder()
            .formatter(plain)
            .sink(FlushFails)
            .on_error(Arc::new(move |_: &LoggerError| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .build();

        assert!(logger.flush_sink().is_err());
        Logger::flush(&logger);
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_with_minimum_level_keeps_sink() {
        let logger = SyncLogger::new(plain, WriterSink::in_memory());
        let strict = logger.with_minimum_level(LogLevel::Error);
        assert!(strict.shares_sink_with(&logger));
        assert_eq!(strict.min_level(), LogLevel::Error);
        assert_eq!(logger.min_level(), LogLevel::Info);
    }
}
