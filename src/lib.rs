//! # batchlog
//!
//! A small logging framework built around an asynchronous batching layer.
//!
//! ## Features
//!
//! - **Non-blocking producers**: [`AsyncLogger`] enqueues records and returns
//!   immediately; one consumer thread hands them to a wrapped logger in
//!   ordered batches
//! - **Lazy messages**: message closures only run for records that pass the
//!   level gate
//! - **Pluggable output**: text and JSON formatters, console, file and
//!   in-memory sinks, fan-out through [`CompositeLogger`]
//! - **`log` facade support**: [`LogBridge`] routes `log::info!` and friends
//!   into any logger
//!
//! ## Example
//!
//! ```
//! use batchlog::prelude::*;
//! use std::time::Duration;
//!
//! let inner = SyncLogger::builder()
//!     .min_level(LogLevel::Debug)
//!     .sink(ConsoleSink::stderr())
//!     .build();
//!
//! let logger = AsyncLogger::builder()
//!     .flush_interval(Duration::from_millis(5))
//!     .build(inner)?;
//!
//! logger.debug("worker started");
//! batchlog::info!(logger, ctx: { "jobs" => 12 }, "queue loaded in {}ms", 42);
//!
//! logger.shutdown();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod formatters;
pub mod log_bridge;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AsyncConfig, AsyncLogger, AsyncLoggerBuilder, CompositeLogger, ErrorCallback,
        ErrorSnapshot, Formatter, LogContext, LogLevel, LogRecord, Logger, LoggerError,
        LoggerExt, LoggerMetrics, LoggerState, NoopLogger, OverflowCallback, Position, Result,
        Sink, SyncLogger, SyncLoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::formatters::{JsonFormatter, TextFormatter, TimestampFormat};
    pub use crate::log_bridge::LogBridge;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::{ConsoleSink, ConsoleTarget, SharedBuffer, WriterSink};
}

pub use crate::core::{
    AsyncConfig, AsyncLogger, AsyncLoggerBuilder, CompositeLogger, ErrorCallback, ErrorSnapshot,
    Formatter, LogContext, LogLevel, LogRecord, Logger, LoggerError, LoggerExt, LoggerMetrics,
    LoggerState, NoopLogger, OverflowCallback, Position, Result, Sink, SyncLogger,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use formatters::{JsonFormatter, TextFormatter, TimestampFormat};
pub use log_bridge::LogBridge;
pub use sinks::{ConsoleSink, WriterSink};
