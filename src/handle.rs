//! Logger handle
//!
//! A [`LoggerHandle`] owns the slot holding the current logger. Publishing a
//! new logger is one atomic store: readers see either the previous complete
//! logger or the new one, never a partially built one. Readers take no lock.
//!
//! The handle starts uninitialized. Every successful `init` replaces the
//! current logger; a failed `init` leaves it as it was. The replaced logger
//! is not closed explicitly; its sinks flush on drop once the last reader
//! releases it.

use crate::compose::compose_logger;
use crate::config::Config;
use crate::core::{LogContext, LogLevel, Logger, Result, Sink};
use crate::destination::{build_destinations, build_destinations_with_sinks};
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

const UNINITIALIZED: &str = "logger is not initialized; call init_logger first";

pub struct LoggerHandle {
    current: ArcSwapOption<Logger>,
}

impl LoggerHandle {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::new(None),
        }
    }

    /// Build destinations and a logger from `config`, then publish it
    ///
    /// # Example
    ///
    /// ```no_run
    /// use level_split_logger::{Config, FileLogConfig, LoggerHandle};
    ///
    /// let handle = LoggerHandle::new();
    /// handle.init(&Config::new().with_file(FileLogConfig::new("./logs", "app"))).unwrap();
    /// handle.warn("written to ./logs/app.WARN.log");
    /// ```
    pub fn init(&self, config: &Config) -> Result<()> {
        let destinations = build_destinations(config)?;
        self.publish(compose_logger(config, destinations)?);
        Ok(())
    }

    /// Like [`init`](Self::init) with caller-supplied sinks
    ///
    /// One sink is filtered by the configured level; five sinks receive one
    /// level each, in `LogLevel::ALL` order.
    pub fn init_with_sinks(&self, config: &Config, sinks: Vec<Box<dyn Sink>>) -> Result<()> {
        let destinations = build_destinations_with_sinks(config, sinks)?;
        self.publish(compose_logger(config, destinations)?);
        Ok(())
    }

    /// Install an already built logger
    pub fn publish(&self, logger: Logger) {
        self.current.store(Some(Arc::new(logger)));
    }

    /// The current logger
    ///
    /// # Panics
    ///
    /// Panics if the handle was never initialized
    #[track_caller]
    pub fn logger(&self) -> Arc<Logger> {
        match self.current.load_full() {
            Some(logger) => logger,
            None => panic!("{}", UNINITIALIZED),
        }
    }

    pub fn try_logger(&self) -> Option<Arc<Logger>> {
        self.current.load_full()
    }

    pub fn is_initialized(&self) -> bool {
        self.current.load().is_some()
    }

    /// Flush every sink of the current logger; a no-op before initialization
    pub fn flush(&self) -> Result<()> {
        match self.current.load_full() {
            Some(logger) => logger.flush(),
            None => Ok(()),
        }
    }

    /// False before initialization
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.current
            .load_full()
            .is_some_and(|logger| logger.is_enabled(level))
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Warn)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        self.logger().log(level, message, context);
    }

    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.logger().log_fmt(level, args);
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.logger().debug(message);
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.logger().info(message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.logger().warn(message);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.logger().error(message);
    }

    /// Write a fatal record, flush, then run the logger's fatal hook
    /// (process exit with code 1 unless configured otherwise)
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.logger().fatal(message)
    }

    #[track_caller]
    pub fn debug_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.logger().debug_with_context(message, context);
    }

    #[track_caller]
    pub fn info_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.logger().info_with_context(message, context);
    }

    #[track_caller]
    pub fn warn_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.logger().warn_with_context(message, context);
    }

    #[track_caller]
    pub fn error_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.logger().error_with_context(message, context);
    }

    #[track_caller]
    pub fn fatal_with_context(&self, message: impl AsRef<str>, context: LogContext) -> ! {
        self.logger().fatal_with_context(message, context)
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("current", &self.current.load_full())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FatalHook, LoggerError};
    use crate::sinks::MemorySink;

    fn memory_handle(level: &str) -> (MemorySink, LoggerHandle) {
        let sink = MemorySink::new();
        let handle = LoggerHandle::new();
        handle
            .init_with_sinks(&Config::new().with_level(level), vec![Box::new(sink.clone())])
            .unwrap();
        (sink, handle)
    }

    #[test]
    fn test_uninitialized_state() {
        let handle = LoggerHandle::new();
        assert!(!handle.is_initialized());
        assert!(handle.try_logger().is_none());
        assert!(!handle.is_enabled(LogLevel::Fatal));
        assert!(handle.flush().is_ok());
    }

    #[test]
    #[should_panic(expected = "logger is not initialized")]
    fn test_logger_panics_when_uninitialized() {
        LoggerHandle::new().info("nowhere to go");
    }

    #[test]
    fn test_enabled_helpers() {
        let (_sink, handle) = memory_handle("info");
        assert!(handle.is_initialized());
        assert!(!handle.is_debug_enabled());
        assert!(handle.is_info_enabled());
        assert!(handle.is_warn_enabled());
    }

    #[test]
    fn test_reinit_replaces_routing() {
        let (first, handle) = memory_handle("debug");
        handle.debug("to first");

        let second = MemorySink::new();
        handle
            .init_with_sinks(&Config::new().with_level("error"), vec![Box::new(second.clone())])
            .unwrap();
        handle.debug("dropped");
        handle.error("to second");

        assert_eq!(first.lines().len(), 1);
        let lines = second.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("to second"));
        assert!(!handle.is_debug_enabled());
    }

    #[test]
    fn test_failed_init_keeps_previous_logger() {
        let (sink, handle) = memory_handle("info");

        let result = handle.init(&Config::new().with_level("chatty"));
        assert!(matches!(result, Err(LoggerError::InvalidSeverity { .. })));

        handle.info("still routed");
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_unrenderable_time_layout_rejected_at_init() {
        let (sink, handle) = memory_handle("info");
        let config: Config =
            serde_json::from_str(r#"{"level":"debug","time-format":{"Custom":"%Q"}}"#).unwrap();

        let result = handle.init_with_sinks(&config, vec![Box::new(MemorySink::new())]);
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));

        let fresh = LoggerHandle::new();
        assert!(fresh.init_with_sinks(&config, vec![Box::new(MemorySink::new())]).is_err());
        assert!(!fresh.is_initialized());

        handle.info("hello");
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_readers_keep_old_logger_alive() {
        let (first, handle) = memory_handle("info");
        let held = handle.logger();

        handle
            .init_with_sinks(&Config::new(), vec![Box::new(MemorySink::new())])
            .unwrap();
        held.info("late write through old logger");

        assert_eq!(first.lines().len(), 1);
    }

    #[test]
    fn test_leveled_calls_with_context() {
        let (sink, handle) = memory_handle("debug");

        handle.debug_with_context("m1", LogContext::new().with_field("k", "v"));
        handle.log_fmt(LogLevel::Warn, format_args!("retry {} of {}", 2, 3));

        let lines = sink.lines();
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["level"], "debug");
        assert_eq!(first["msg"], "m1");
        assert_eq!(first["k"], "v");
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["msg"], "retry 2 of 3");
    }

    #[test]
    fn test_fatal_through_handle() {
        let (sink, handle) = memory_handle("info");
        let logger = (*handle.logger()).clone().with_fatal_hook(FatalHook::Panic);
        handle.publish(logger);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            handle.fatal_with_context("shutting down", LogContext::new().with_field("code", 7));
        }));

        assert!(result.is_err());
        let record: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(record["level"], "fatal");
        assert_eq!(record["code"], 7);
    }
}
