//! Basic usage example
//!
//! Demonstrates synchronous logging with the text and JSON formatters.
//!
//! Run with: cargo run --example basic_usage

use batchlog::prelude::*;
use batchlog::{error, info, warn};

fn main() -> Result<()> {
    println!("=== batchlog - Basic Usage Example ===\n");

    let logger = SyncLogger::builder()
        .min_level(LogLevel::Debug)
        .formatter(TextFormatter::new().with_colors(true))
        .sink(ConsoleSink::stdout())
        .build();

    println!("1. Level methods:");
    logger.trace("Filtered out: below Debug");
    logger.debug("Debug message");
    logger.info("Info message");
    logger.warn("Warning message");
    logger.error("Error message");

    println!("\n2. Macros with formatting and context:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, ctx: { "user" => "alice", "attempts" => 3 }, "Login throttled");

    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only filesystem");
    error!(logger, err: &err, "Could not persist session");

    println!("\n3. JSON output:");
    let json = SyncLogger::new(JsonFormatter::new(), ConsoleSink::stdout());
    json.log_with_context(
        LogLevel::Info,
        "Order placed",
        LogContext::new().with_field("order_id", 1042).with_field("total", "19.99"),
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
