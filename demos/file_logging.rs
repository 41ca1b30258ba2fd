//! File logging example
//!
//! Demonstrates per-level file routing: each record lands in exactly one of
//! `application.DEBUG.log` ... `application.FATAL.log`.
//!
//! Run with: cargo run --example file_logging

use level_split_logger::prelude::*;
use level_split_logger::{level_file_name, warn};

fn main() -> Result<()> {
    println!("=== Level Split Logger - File Logging Example ===\n");

    let file = FileLogConfig::new("./logs", "application")
        .with_max_size(10)
        .with_max_days(7)
        .with_max_backups(3)
        .with_compression(true);
    let config = Config::new().with_file(file);

    // A handle owned by the application rather than the process-wide one
    let handle = LoggerHandle::new();
    handle.init(&config)?;

    println!("1. Logging one message per level:");
    handle.debug("Loading configuration...");
    handle.info("Application started");
    handle.warn("Using default settings for some options");
    handle.error_with_context(
        "Failed to load optional plugin",
        LogContext::new().with_field("plugin", "metrics-exporter"),
    );

    println!("2. Performing some operations:");
    for i in 1..=5 {
        handle.info_with_context("Processing item", LogContext::new().with_field("item", i));
        if i == 3 {
            warn!(handle, "Item {} took longer than expected", i);
        }
    }

    handle.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check these files for the output:");
    for level in LogLevel::ALL {
        println!("  ./logs/{}", level_file_name("application", level));
    }

    Ok(())
}
