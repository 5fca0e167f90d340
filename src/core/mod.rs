//! Core logger types and traits

pub mod async_logger;
pub mod composite;
pub mod error;
pub mod formatter;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod sync_logger;

pub use async_logger::{
    AsyncConfig, AsyncLogger, AsyncLoggerBuilder, LoggerState, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use composite::{CompositeLogger, NoopLogger};
pub use error::{LoggerError, Result};
pub use formatter::Formatter;
pub use log_context::LogContext;
pub use log_level::LogLevel;
pub use log_record::{ErrorSnapshot, LogRecord, Position};
pub use logger::{ErrorCallback, Logger, LoggerExt, OverflowCallback};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use sync_logger::{SyncLogger, SyncLoggerBuilder};
