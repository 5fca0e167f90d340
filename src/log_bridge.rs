//! Bridge from the `log` crate facade
//!
//! [`LogBridge`] implements [`log::Log`] on top of any [`Logger`], so
//! libraries that emit through `log::info!` and friends end up in the same
//! pipeline as records logged directly.

use crate::core::{LogContext, LogLevel, LogRecord, Logger, LoggerError, Position, Result};
use log::{Metadata, Record};
use std::borrow::Cow;

/// Adapter implementing [`log::Log`] for a [`Logger`]
///
/// The record's file, module path and line become the [`Position`]; a target
/// that differs from the module path is kept as a `target` context field.
pub struct LogBridge<L: Logger> {
    logger: L,
}

impl<L: Logger> LogBridge<L> {
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    fn position(record: &Record<'_>) -> Position {
        let file = match record.file_static() {
            Some(file) => Cow::Borrowed(file),
            None => Cow::Owned(record.file().unwrap_or("<unknown>").to_string()),
        };
        let module_path = match record.module_path_static() {
            Some(module) => Some(Cow::Borrowed(module)),
            None => record.module_path().map(|m| Cow::Owned(m.to_string())),
        };
        Position::dynamic(file, module_path, record.line().unwrap_or(0))
    }

    fn convert(record: &Record<'_>) -> LogRecord {
        let mut context = LogContext::new();
        if record.module_path() != Some(record.target()) {
            context.add_field("target", record.target());
        }

        LogRecord::at(
            LogLevel::from(record.level()),
            Self::position(record),
            record.args().to_string(),
        )
        .with_context(context)
    }
}

impl<L: Logger + 'static> LogBridge<L> {
    /// Install `logger` as the process-wide `log` backend
    ///
    /// The `log` max level is set from the logger's gate. Fails if any global
    /// logger was installed before.
    pub fn install(logger: L) -> Result<()> {
        let max_level = log::LevelFilter::from(logger.min_level());
        log::set_boxed_logger(Box::new(Self::new(logger))).map_err(|_| {
            LoggerError::illegal_state("a global `log` logger is already installed")
        })?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl<L: Logger> log::Log for LogBridge<L> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.logger.is_enabled(LogLevel::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.logger.dispatch(Self::convert(record));
    }

    fn flush(&self) {
        self.logger.flush();
    }
}
