//! Basic usage example
//!
//! Demonstrates the process-wide logger writing to the console behind a
//! minimum level, structured fields, and the formatting macros.
//!
//! Run with: cargo run --example basic_usage

use level_split_logger::prelude::*;
use level_split_logger::{debugf, infof, warnf};

fn main() -> Result<()> {
    println!("=== Level Split Logger - Basic Usage Example ===\n");

    // Console mode: one stdout sink behind the configured minimum level
    let config = Config::new()
        .with_level("debug")
        .with_format("console")
        .with_development(true);
    level_split_logger::init_logger(&config)?;

    println!("1. Leveled messages:");
    level_split_logger::debug("Debug message - detailed information");
    level_split_logger::info("Info message - general information");
    level_split_logger::warn("Warn message - something looks off");
    level_split_logger::error("Error message - something failed");

    println!("\n2. Structured fields:");
    level_split_logger::info_with_context(
        "User logged in",
        LogContext::new()
            .with_field("user_id", 42)
            .with_field("remote_addr", "10.0.0.7"),
    );

    println!("\n3. Formatting macros:");
    let items = 128;
    infof!("Processed {} items", items);
    debugf!("Cache hit ratio {:.2}", 0.93);
    warnf!("Queue depth {} above soft limit", 900);

    println!("\n4. Re-initializing with a higher minimum level (JSON output):");
    level_split_logger::init_logger(&Config::new().with_level("warn"))?;
    level_split_logger::info("This info message is filtered out");
    level_split_logger::warn("Only warn and above reach the console now");
    println!(
        "   debug enabled: {}, warn enabled: {}",
        level_split_logger::is_debug_enabled(),
        level_split_logger::is_warn_enabled()
    );

    level_split_logger::flush()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
