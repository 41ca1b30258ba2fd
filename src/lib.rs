//! # Level Split Logger
//!
//! Structured logging that routes each record by severity: either to one
//! console sink behind a minimum level, or to one rotating file per level
//! (`app.DEBUG.log` ... `app.FATAL.log`).
//!
//! ## Features
//!
//! - **Per-level files**: every level gets its own rotating, optionally
//!   compressed file
//! - **Fan-out**: a record is encoded once and written to every sink whose
//!   filter accepts it
//! - **Atomic re-initialization**: a new logger is published in one store;
//!   concurrent callers never see a half-built one
//! - **Structured fields**: JSON or console output with caller, stack traces
//!   and error chains
//!
//! ## Example
//!
//! ```
//! use level_split_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let handle = LoggerHandle::new();
//! handle
//!     .init_with_sinks(&Config::new().with_level("debug"), vec![Box::new(sink.clone())])
//!     .unwrap();
//!
//! handle.debug_with_context("m1", LogContext::new().with_field("k", "v"));
//!
//! let line = &sink.lines()[0];
//! assert!(line.contains("\"level\":\"debug\""));
//! assert!(line.contains("\"msg\":\"m1\""));
//! assert!(line.contains("\"k\":\"v\""));
//! ```

pub mod compose;
pub mod config;
pub mod core;
pub mod destination;
pub mod handle;
pub mod macros;
pub mod sinks;

use std::fmt;
use std::sync::{Arc, OnceLock};

pub mod prelude {
    pub use crate::compose::compose_logger;
    pub use crate::config::{Config, FileLogConfig};
    pub use crate::core::{
        Destination, FatalHook, FieldValue, LogContext, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, LoggerOptions, Result, SamplingConfig, SeverityFilter, Sink,
    };
    pub use crate::destination::{build_destinations, build_destinations_with_sinks};
    pub use crate::handle::LoggerHandle;
    pub use crate::sinks::{ConsoleSink, MemorySink, RotatingFileSink, RotationPolicy};
}

pub use crate::compose::compose_logger;
pub use crate::config::{Config, FileLogConfig};
pub use crate::core::{
    Caller, Destination, EncoderConfig, FanOutCore, FatalHook, FieldValue, LogContext, LogCore,
    LogEntry, LogLevel, LogSampler, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    LoggerOptions, OutputFormat, RecordEncoder, Result, SamplerMetrics, SamplingConfig,
    SeverityFilter, Sink, TimestampFormat,
};
pub use crate::destination::{
    build_destinations, build_destinations_with_sinks, level_file_name, DEFAULT_LOG_MAX_SIZE_MB,
};
pub use crate::handle::LoggerHandle;
pub use crate::sinks::{ConsoleSink, ConsoleTarget, MemorySink, RotatingFileSink, RotationPolicy};

static GLOBAL: OnceLock<LoggerHandle> = OnceLock::new();

/// The process-wide handle behind the free functions of this crate
pub fn global() -> &'static LoggerHandle {
    GLOBAL.get_or_init(LoggerHandle::new)
}

/// Initialize (or re-initialize) the process-wide logger
///
/// ```no_run
/// use level_split_logger::{init_logger, Config, FileLogConfig};
///
/// let config = Config::new().with_file(FileLogConfig::new("./logs", "app").with_max_size(1));
/// init_logger(&config).unwrap();
/// level_split_logger::warn("only in ./logs/app.WARN.log");
/// ```
pub fn init_logger(config: &Config) -> Result<()> {
    global().init(config)
}

pub fn init_logger_with_sinks(config: &Config, sinks: Vec<Box<dyn Sink>>) -> Result<()> {
    global().init_with_sinks(config, sinks)
}

/// The process-wide logger
///
/// # Panics
///
/// Panics if [`init_logger`] has not succeeded yet
#[track_caller]
pub fn logger() -> Arc<Logger> {
    global().logger()
}

pub fn try_logger() -> Option<Arc<Logger>> {
    global().try_logger()
}

pub fn flush() -> Result<()> {
    global().flush()
}

pub fn is_enabled(level: LogLevel) -> bool {
    global().is_enabled(level)
}

pub fn is_debug_enabled() -> bool {
    global().is_debug_enabled()
}

pub fn is_info_enabled() -> bool {
    global().is_info_enabled()
}

pub fn is_warn_enabled() -> bool {
    global().is_warn_enabled()
}

#[track_caller]
pub fn log(level: LogLevel, message: impl AsRef<str>, context: LogContext) {
    global().log(level, message, context);
}

#[doc(hidden)]
#[track_caller]
pub fn log_fmt(level: LogLevel, args: fmt::Arguments<'_>) {
    global().log_fmt(level, args);
}

#[track_caller]
pub fn debug(message: impl AsRef<str>) {
    global().debug(message);
}

#[track_caller]
pub fn info(message: impl AsRef<str>) {
    global().info(message);
}

#[track_caller]
pub fn warn(message: impl AsRef<str>) {
    global().warn(message);
}

#[track_caller]
pub fn error(message: impl AsRef<str>) {
    global().error(message);
}

/// Log at fatal level, flush every sink, then exit the process (code 1 by
/// default, see [`FatalHook`])
#[track_caller]
pub fn fatal(message: impl AsRef<str>) -> ! {
    global().fatal(message)
}

#[track_caller]
pub fn debug_with_context(message: impl AsRef<str>, context: LogContext) {
    global().debug_with_context(message, context);
}

#[track_caller]
pub fn info_with_context(message: impl AsRef<str>, context: LogContext) {
    global().info_with_context(message, context);
}

#[track_caller]
pub fn warn_with_context(message: impl AsRef<str>, context: LogContext) {
    global().warn_with_context(message, context);
}

#[track_caller]
pub fn error_with_context(message: impl AsRef<str>, context: LogContext) {
    global().error_with_context(message, context);
}

#[track_caller]
pub fn fatal_with_context(message: impl AsRef<str>, context: LogContext) -> ! {
    global().fatal_with_context(message, context)
}
