//! Async logging example
//!
//! Demonstrates the batching logger with several producer threads.
//!
//! Run with: cargo run --example async_logging

use batchlog::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== batchlog - Async Logging Example ===\n");

    let inner = SyncLogger::builder()
        .min_level(LogLevel::Debug)
        .sink(ConsoleSink::stdout())
        .build();

    let logger = AsyncLogger::builder()
        .flush_interval(Duration::from_millis(20))
        .max_buffer_size(1000)
        .batch_size(100)
        .on_overflow(Arc::new(|dropped| {
            eprintln!("ALERT: {} log records dropped", dropped);
        }))
        .build(inner)?;

    println!("1. High-performance async logging:");
    for i in 0..100 {
        logger.info(format!("Message #{}", i));
    }
    logger.drain();
    println!("   Logged and drained 100 messages");

    println!("\n2. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = logger.clone();
            thread::Builder::new()
                .name(format!("worker-{}", thread_id))
                .spawn(move || {
                    for i in 0..20 {
                        logger.info(format!("Thread {} - Message {}", thread_id, i));
                        thread::sleep(Duration::from_millis(10));
                    }
                })
                .map_err(LoggerError::SpawnError)
        })
        .collect::<Result<_>>()?;

    for handle in handles {
        let _ = handle.join();
    }
    println!("   5 threads logged 20 messages each");

    println!("\n3. Per-handle gates share one consumer:");
    let quiet = logger.with_minimum_level(LogLevel::Warn);
    quiet.info("Not shown");
    quiet.warn("Shown through the quiet handle");

    logger.shutdown();

    let metrics = logger.metrics();
    println!(
        "\nSubmitted {} records in {} batches, dropped {}",
        metrics.records_submitted(),
        metrics.batches_submitted(),
        metrics.dropped_count()
    );
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
