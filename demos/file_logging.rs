//! File logging example
//!
//! Demonstrates routing records to a file and the console at once, and
//! bridging the `log` crate facade.
//!
//! Run with: cargo run --example file_logging

use batchlog::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== batchlog - File Logging Example ===\n");

    let file = SyncLogger::builder()
        .min_level(LogLevel::Trace)
        .formatter(JsonFormatter::new().with_timestamp_format(TimestampFormat::UnixMillis))
        .sink(FileSink::new("application.log")?)
        .build();
    let console = SyncLogger::builder()
        .min_level(LogLevel::Warn)
        .formatter(TextFormatter::new().with_position(true))
        .sink(ConsoleSink::stderr())
        .build();

    let children: Vec<Arc<dyn Logger>> = vec![Arc::new(file), Arc::new(console)];
    let logger = AsyncLogger::builder()
        .flush_interval(Duration::from_millis(10))
        .min_level(LogLevel::Debug)
        .build(CompositeLogger::new(children))?;

    println!("1. Logging to file and console:");
    logger.debug("Only in the file");
    logger.warn("In the file and on stderr");

    println!("\n2. Records from the `log` facade:");
    LogBridge::install(logger.clone())?;
    log::info!("Forwarded through the bridge");
    log::error!(target: "payments", "Card declined");

    logger.shutdown();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for file output");
    Ok(())
}
