//! Asynchronous batching logger
//!
//! [`AsyncLogger`] wraps any [`Logger`] and decouples producers from it with a
//! FIFO queue and a single background consumer thread. Producers only ever
//! perform a non-blocking `try_send`; the consumer wakes on a fixed flush
//! interval (or early on an explicit drain, a batch-size threshold, or
//! shutdown), takes every queued record as one ordered batch, and hands it to
//! the wrapped logger's [`Logger::submit_batch`].
//!
//! Lifecycle: `Running` → `Draining` → `Stopped`. Shutdown closes the queue to
//! new records, runs a final drain, joins the consumer and only then returns.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    logger::{report_error, ErrorCallback, Logger, OverflowCallback},
    metrics::LoggerMetrics,
};
use crossbeam_channel::{
    bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// Used when the last handle is dropped without an explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default period between consumer ticks
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// Alert on the first drop and then every this many drops
const OVERFLOW_ALERT_EVERY: u64 = 1000;

/// Lifecycle of an [`AsyncLogger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoggerState {
    /// Consumer active, queue accepting records
    Running = 0,
    /// Queue closed, consumer flushing what remains
    Draining = 1,
    /// Consumer terminated
    Stopped = 2,
}

impl LoggerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoggerState::Running,
            1 => LoggerState::Draining,
            _ => LoggerState::Stopped,
        }
    }
}

/// Queue and timing configuration for an [`AsyncLogger`]
///
/// Deserializes from e.g. `{"flush_interval_ms": 5, "max_buffer_size": 1024}`;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncConfig {
    /// Period between consumer ticks
    #[serde(rename = "flush_interval_ms", with = "millis")]
    pub flush_interval: Duration,
    /// Queue capacity; `None` means unbounded
    pub max_buffer_size: Option<usize>,
    /// Wake the consumer early once this many records are queued
    pub batch_size: Option<usize>,
}

impl Default for AsyncConfig {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_buffer_size: None,
            batch_size: None,
        }
    }
}

impl AsyncConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AsyncConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.flush_interval.is_zero() {
            return Err(LoggerError::config(
                "AsyncLogger",
                "flush interval must be positive",
            ));
        }
        if self.max_buffer_size == Some(0) {
            return Err(LoggerError::config(
                "AsyncLogger",
                "max buffer size must be positive",
            ));
        }
        if self.batch_size == Some(0) {
            return Err(LoggerError::config(
                "AsyncLogger",
                "batch size must be positive",
            ));
        }
        Ok(())
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Messages from handles to the consumer thread
enum Control {
    /// Run one cycle now and acknowledge when done
    Drain(Sender<()>),
    /// Batch-size threshold reached
    Wake,
    /// Final drain, then exit
    Shutdown,
}

/// State shared by every handle of one async logger
struct Shared {
    queue: Sender<LogRecord>,
    control: Sender<Control>,
    state: Arc<AtomicU8>,
    wake_pending: Arc<AtomicBool>,
    /// Producers between their state check and their send
    in_flight: Arc<AtomicUsize>,
    metrics: Arc<LoggerMetrics>,
    max_buffer_size: Option<usize>,
    batch_size: Option<usize>,
    on_overflow: Option<OverflowCallback>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn state(&self) -> LoggerState {
        LoggerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Offer one record to the queue without blocking
    ///
    /// Drops are counted here; the returned error only tells the caller why.
    fn enqueue(&self, record: LogRecord) -> Result<()> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = self.offer(record);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn offer(&self, record: LogRecord) -> Result<()> {
        if self.state.load(Ordering::SeqCst) != LoggerState::Running as u8 {
            self.metrics.record_dropped();
            return Err(LoggerError::LoggerStopped);
        }

        match self.queue.try_send(record) {
            Ok(()) => {
                self.metrics.record_enqueued();
                self.maybe_wake();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.metrics.record_queue_full();
                self.alert_and_drop();
                let max = self.max_buffer_size.unwrap_or_default();
                Err(LoggerError::queue_full(self.queue.len(), max))
            }
            Err(TrySendError::Disconnected(_)) => {
                // Consumer already gone
                self.metrics.record_dropped();
                Err(LoggerError::LoggerStopped)
            }
        }
    }

    fn maybe_wake(&self) {
        let Some(threshold) = self.batch_size else {
            return;
        };
        if self.queue.len() >= threshold && !self.wake_pending.swap(true, Ordering::AcqRel) {
            let _ = self.control.send(Control::Wake);
        }
    }

    /// Drop the newest record, alerting on the first drop and periodically
    fn alert_and_drop(&self) {
        let dropped = self.metrics.record_dropped() + 1;
        if dropped != 1 && dropped % OVERFLOW_ALERT_EVERY != 0 {
            return;
        }

        match &self.on_overflow {
            Some(callback) => callback(dropped),
            None => eprintln!(
                "[LOGGER WARNING] Queue full ({} records), {} logs dropped. \
                 Consider increasing the buffer size or the flush rate.",
                self.max_buffer_size.unwrap_or_default(),
                dropped
            ),
        }
    }

    fn drain(&self) {
        if self.state() == LoggerState::Stopped {
            return;
        }
        let (ack_tx, ack_rx) = bounded(1);
        if self.control.send(Control::Drain(ack_tx)).is_err() {
            return;
        }
        // Err means the consumer exited first, after its own final drain
        let _ = ack_rx.recv();
    }

    fn shutdown(&self, timeout: Option<Duration>) -> bool {
        let _ = self.state.compare_exchange(
            LoggerState::Running as u8,
            LoggerState::Draining as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        let _ = self.control.send(Control::Shutdown);

        let handle = self.worker.lock().take();
        let Some(handle) = handle else {
            return self.wait_stopped(timeout);
        };

        if !wait_finished(&handle, timeout) {
            eprintln!(
                "[LOGGER WARNING] Async consumer did not finish within {:?}. \
                 Some logs may be lost.",
                timeout.unwrap_or_default()
            );
            // Keep the handle so a later shutdown can still join
            *self.worker.lock() = Some(handle);
            return false;
        }

        if let Err(e) = handle.join() {
            eprintln!("[LOGGER ERROR] Async consumer panicked during shutdown: {:?}", e);
            return false;
        }
        true
    }

    /// Wait for a shutdown started by another handle
    fn wait_stopped(&self, timeout: Option<Duration>) -> bool {
        let start = Instant::now();
        while self.state() != LoggerState::Stopped {
            if timeout.is_some_and(|t| start.elapsed() >= t) {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
        true
    }
}

fn wait_finished(handle: &JoinHandle<()>, timeout: Option<Duration>) -> bool {
    let Some(timeout) = timeout else {
        return true;
    };
    let start = Instant::now();
    while !handle.is_finished() {
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
    true
}

impl Drop for Shared {
    fn drop(&mut self) {
        if self.worker.get_mut().is_some() {
            self.shutdown(Some(DEFAULT_SHUTDOWN_TIMEOUT));
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 && self.on_overflow.is_none() {
            eprintln!(
                "[LOGGER WARNING] Async logger shut down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Background consumer owning the wrapped logger and the queue's receiving end
struct Worker<L: Logger> {
    inner: L,
    queue: Receiver<LogRecord>,
    control: Receiver<Control>,
    state: Arc<AtomicU8>,
    wake_pending: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
    metrics: Arc<LoggerMetrics>,
    flush_interval: Duration,
    on_error: Option<ErrorCallback>,
}

impl<L: Logger> Worker<L> {
    fn run(self) {
        let mut next_tick = Instant::now() + self.flush_interval;

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match self.control.recv_timeout(timeout) {
                Err(RecvTimeoutError::Timeout) => {
                    self.cycle();
                    next_tick = Instant::now() + self.flush_interval;
                }
                Ok(Control::Wake) => {
                    self.wake_pending.store(false, Ordering::Release);
                    self.cycle();
                }
                Ok(Control::Drain(ack)) => {
                    self.cycle();
                    self.flush_inner();
                    let _ = ack.send(());
                }
                Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.state
            .store(LoggerState::Draining as u8, Ordering::SeqCst);
        self.wait_for_producers();
        self.final_drain();
    }

    /// Let producers that saw `Running` finish their send, so the final
    /// drain sees every record that was accepted
    fn wait_for_producers(&self) {
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            thread::yield_now();
        }
    }

    /// One dequeue-and-submit cycle; returns the batch size
    ///
    /// Takes at most the records present when the cycle starts, so a steady
    /// stream of producers cannot keep a single cycle running forever.
    fn cycle(&self) -> usize {
        let pending = self.queue.len();
        if pending == 0 {
            return 0;
        }

        let batch: Vec<LogRecord> = self.queue.try_iter().take(pending).collect();
        let size = batch.len();
        self.submit(batch);
        size
    }

    /// Flush everything still queued; producers are already rejected
    fn final_drain(&self) {
        loop {
            let batch: Vec<LogRecord> = self.queue.try_iter().collect();
            if batch.is_empty() {
                break;
            }
            self.submit(batch);
        }
    }

    fn flush_inner(&self) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| self.inner.flush())) {
            let error = LoggerError::panicked("wrapped logger", payload.as_ref());
            report_error(self.on_error.as_ref(), &error);
        }
    }

    /// Hand a batch to the wrapped logger, swallowing errors and panics
    fn submit(&self, batch: Vec<LogRecord>) {
        self.metrics.record_batch(batch.len());

        let outcome = catch_unwind(AssertUnwindSafe(|| self.inner.submit_batch(batch)));
        let error = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(payload) => LoggerError::panicked("wrapped logger", payload.as_ref()),
        };

        self.metrics.record_batch_failure();
        report_error(self.on_error.as_ref(), &error);
    }
}

impl<L: Logger> Drop for Worker<L> {
    /// Runs after the final drain, and also if the consumer unwinds
    fn drop(&mut self) {
        self.state.store(LoggerState::Stopped as u8, Ordering::Release);
    }
}

/// Non-blocking logger that batches records for a wrapped [`Logger`]
///
/// Handles are cheap to clone; every clone and every
/// [`with_minimum_level`](Logger::with_minimum_level) derivative shares the
/// same queue and consumer thread. The consumer is stopped by
/// [`shutdown`](AsyncLogger::shutdown) or when the last handle is dropped.
///
/// # Example
///
/// ```
/// use batchlog::prelude::*;
/// use std::time::Duration;
///
/// let sink = WriterSink::in_memory();
/// let buffer = sink.buffer();
/// let inner = SyncLogger::new(|r: &LogRecord| r.message().to_string(), sink);
///
/// let logger = AsyncLogger::builder()
///     .flush_interval(Duration::from_millis(5))
///     .max_buffer_size(1024)
///     .build(inner)
///     .unwrap();
///
/// logger.info("queued");
/// logger.drain();
/// assert_eq!(buffer.contents(), "queued\n");
/// assert!(logger.shutdown());
/// ```
pub struct AsyncLogger<L: Logger> {
    shared: Arc<Shared>,
    min_level: LogLevel,
    _inner: PhantomData<fn() -> L>,
}

impl<L: Logger + 'static> AsyncLogger<L> {
    /// Start the consumer for `inner` with the given configuration
    ///
    /// The gate defaults to the wrapped logger's own minimum level.
    pub fn start(inner: L, config: AsyncConfig) -> Result<Self> {
        AsyncLoggerBuilder::new().config(config).build(inner)
    }

    /// Run `f` with a started logger, shutting it down afterwards
    ///
    /// Every record logged inside `f` has been submitted to `inner` by the
    /// time this returns.
    pub fn scoped<R>(inner: L, config: AsyncConfig, f: impl FnOnce(&Self) -> R) -> Result<R> {
        let logger = Self::start(inner, config)?;
        let output = f(&logger);
        logger.shutdown();
        Ok(output)
    }
}

impl AsyncLogger<super::sync_logger::SyncLogger> {
    /// Create a builder for AsyncLogger
    ///
    /// The wrapped logger type is fixed by [`AsyncLoggerBuilder::build`], so
    /// the builder works for any inner logger despite living on this impl.
    #[must_use]
    pub fn builder() -> AsyncLoggerBuilder {
        AsyncLoggerBuilder::new()
    }
}

impl<L: Logger> AsyncLogger<L> {
    pub fn state(&self) -> LoggerState {
        self.shared.state()
    }

    /// Records currently waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Queue capacity, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.shared.max_buffer_size
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.shared.metrics.dropped_count()
    }

    /// Whether both handles drive the same queue and consumer
    pub fn shares_queue_with(&self, other: &AsyncLogger<L>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Submit everything queued now, returning once the consumer has done so
    /// and has flushed the wrapped logger
    ///
    /// Must not be called from inside the wrapped logger: the consumer would
    /// wait on itself.
    pub fn drain(&self) {
        self.shared.drain();
    }

    /// Stop accepting records, flush the queue and join the consumer
    ///
    /// Returns `false` if the consumer panicked. Safe to call from any handle
    /// and more than once.
    pub fn shutdown(&self) -> bool {
        self.shared.shutdown(None)
    }

    /// Like [`shutdown`](Self::shutdown) but gives up after `timeout`
    pub fn shutdown_timeout(&self, timeout: Duration) -> bool {
        self.shared.shutdown(Some(timeout))
    }
}

impl<L: Logger> Clone for AsyncLogger<L> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            min_level: self.min_level,
            _inner: PhantomData,
        }
    }
}

impl<L: Logger> Logger for AsyncLogger<L> {
    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn dispatch(&self, record: LogRecord) {
        let _ = self.shared.enqueue(record);
    }

    /// Always panics: the async layer only accepts batches
    fn submit_one(&self, _record: LogRecord) -> Result<()> {
        panic!(
            "{}",
            LoggerError::illegal_state(
                "submit_one called on AsyncLogger; records must go through the batching path"
            )
        );
    }

    /// Enqueue every record in order, subject to the overflow policy
    ///
    /// Every record is offered even after one is dropped; the first drop
    /// reason is returned.
    fn submit_batch(&self, records: Vec<LogRecord>) -> Result<()> {
        let mut first_error = None;
        for record in records {
            if let Err(e) = self.shared.enqueue(record) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Same as [`AsyncLogger::drain`]
    fn flush(&self) {
        self.shared.drain();
    }

    fn with_minimum_level(&self, level: LogLevel) -> Self {
        Self {
            min_level: level,
            ..self.clone()
        }
    }
}

/// Builder for [`AsyncLogger`]
///
/// # Example
/// ```
/// use batchlog::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let logger = AsyncLogger::builder()
///     .flush_interval(Duration::from_millis(20))
///     .max_buffer_size(10_000)
///     .batch_size(256)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} logs dropped", count);
///     }))
///     .build(SyncLogger::builder().sink(ConsoleSink::stderr()).build())
///     .unwrap();
/// logger.shutdown();
/// ```
pub struct AsyncLoggerBuilder {
    config: AsyncConfig,
    min_level: Option<LogLevel>,
    on_overflow: Option<OverflowCallback>,
    on_error: Option<ErrorCallback>,
    thread_name: String,
}

impl AsyncLoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: AsyncConfig::default(),
            min_level: None,
            on_overflow: None,
            on_error: None,
            thread_name: "batchlog-consumer".to_string(),
        }
    }

    /// Replace the whole queue configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: AsyncConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Bound the queue; when full, the newest record is dropped
    #[must_use = "builder methods return a new value"]
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.config.max_buffer_size = Some(size);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn unbounded(mut self) -> Self {
        self.config.max_buffer_size = None;
        self
    }

    /// Wake the consumer before the next tick once this many records wait
    #[must_use = "builder methods return a new value"]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = Some(size);
        self
    }

    /// Gate for the async handle; defaults to the wrapped logger's level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Callback invoked with the running drop count on overflow
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Callback for batch submissions that failed or panicked
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Validate the configuration and start the consumer thread
    pub fn build<L: Logger + 'static>(self, inner: L) -> Result<AsyncLogger<L>> {
        self.config.validate()?;

        let (queue_tx, queue_rx) = match self.config.max_buffer_size {
            Some(size) => bounded(size),
            None => unbounded(),
        };
        let (control_tx, control_rx) = unbounded();
        let state = Arc::new(AtomicU8::new(LoggerState::Running as u8));
        let wake_pending = Arc::new(AtomicBool::new(false));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let metrics = Arc::new(LoggerMetrics::new());
        let min_level = self.min_level.unwrap_or_else(|| inner.min_level());

        let worker = Worker {
            inner,
            queue: queue_rx,
            control: control_rx,
            state: Arc::clone(&state),
            wake_pending: Arc::clone(&wake_pending),
            in_flight: Arc::clone(&in_flight),
            metrics: Arc::clone(&metrics),
            flush_interval: self.config.flush_interval,
            on_error: self.on_error,
        };

        let handle = thread::Builder::new()
            .name(self.thread_name)
            .spawn(move || worker.run())
            .map_err(LoggerError::SpawnError)?;

        Ok(AsyncLogger {
            shared: Arc::new(Shared {
                queue: queue_tx,
                control: control_tx,
                state,
                wake_pending,
                in_flight,
                metrics,
                max_buffer_size: self.config.max_buffer_size,
                batch_size: self.config.batch_size,
                on_overflow: self.on_overflow,
                worker: Mutex::new(Some(handle)),
            }),
            min_level,
            _inner: PhantomData,
        })
    }
}

impl Default for AsyncLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
