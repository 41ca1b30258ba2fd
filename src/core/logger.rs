//! Composed logger
//!
//! A [`Logger`] is a cheap, cloneable front over one [`FanOutCore`]. It adds
//! the per-record metadata (caller, stack trace, preset fields), runs the
//! sampler and owns the fatal path.

use super::{
    encoder::RecordEncoder,
    error::Result,
    filter::SeverityFilter,
    log_context::LogContext,
    log_core::{Destination, FanOutCore},
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sampling::{LogSampler, SamplerMetrics, SamplingConfig},
    sink::Sink,
};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// What happens after a fatal record has been written and flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalHook {
    /// Terminate the process with this exit code
    Exit(i32),
    /// Unwind with a panic carrying the message
    Panic,
}

impl Default for FatalHook {
    fn default() -> Self {
        FatalHook::Exit(1)
    }
}

impl FatalHook {
    fn run(&self, message: &str) -> ! {
        match self {
            FatalHook::Exit(code) => std::process::exit(*code),
            FatalHook::Panic => panic!("fatal: {}", message),
        }
    }
}

/// Metadata options applied to every record of a logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    pub add_caller: bool,
    /// Attach a stack trace to records at or above this level
    pub stacktrace_level: Option<LogLevel>,
    pub fatal_hook: FatalHook,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            add_caller: true,
            stacktrace_level: Some(LogLevel::Error),
            fatal_hook: FatalHook::default(),
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<FanOutCore>,
    sampler: Option<Arc<LogSampler>>,
    options: LoggerOptions,
    fields: LogContext,
    /// Metrics for observability, shared with child loggers
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    pub fn new(core: FanOutCore, options: LoggerOptions) -> Self {
        Self {
            core: Arc::new(core),
            sampler: None,
            options,
            fields: LogContext::new(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use level_split_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let logger = Logger::builder()
    ///     .destination(SeverityFilter::Threshold(LogLevel::Debug), sink.clone())
    ///     .build();
    ///
    /// logger.info("Server started");
    /// assert_eq!(sink.lines().len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[must_use]
    pub fn with_sampler(mut self, sampler: LogSampler) -> Self {
        self.sampler = Some(Arc::new(sampler));
        self
    }

    #[must_use]
    pub fn with_fatal_hook(mut self, hook: FatalHook) -> Self {
        self.options.fatal_hook = hook;
        self
    }

    /// Child logger sharing this logger's cores, with `fields` added to
    /// every record it writes
    #[must_use]
    pub fn with(&self, fields: LogContext) -> Self {
        let mut child = self.clone();
        child.fields.merge(&fields);
        child
    }

    /// True if at least one core would write a record at `level`
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        self.emit(level, message.as_ref(), Some(context));
        if level == LogLevel::Fatal {
            self.terminate(message.as_ref());
        }
    }

    /// Log pre-formatted arguments; formatting is skipped for disabled levels
    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level != LogLevel::Fatal && !self.is_enabled(level) {
            return;
        }
        let message = args.to_string();
        self.emit(level, &message, None);
        if level == LogLevel::Fatal {
            self.terminate(&message);
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Debug, message.as_ref(), None);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Info, message.as_ref(), None);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Warn, message.as_ref(), None);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Error, message.as_ref(), None);
    }

    /// Write a fatal record, flush every sink, then run the fatal hook
    ///
    /// The hook runs even when no core accepts fatal records.
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.emit(LogLevel::Fatal, message.as_ref(), None);
        self.terminate(message.as_ref())
    }

    #[track_caller]
    pub fn debug_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.emit(LogLevel::Debug, message.as_ref(), Some(context));
    }

    #[track_caller]
    pub fn info_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.emit(LogLevel::Info, message.as_ref(), Some(context));
    }

    #[track_caller]
    pub fn warn_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.emit(LogLevel::Warn, message.as_ref(), Some(context));
    }

    #[track_caller]
    pub fn error_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        self.emit(LogLevel::Error, message.as_ref(), Some(context));
    }

    #[track_caller]
    pub fn fatal_with_context(&self, message: impl AsRef<str>, context: LogContext) -> ! {
        self.emit(LogLevel::Fatal, message.as_ref(), Some(context));
        self.terminate(message.as_ref())
    }

    pub fn flush(&self) -> Result<()> {
        self.core.flush()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use level_split_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .destination(SeverityFilter::Threshold(LogLevel::Info), MemorySink::new())
    ///     .build();
    /// logger.info("counted");
    /// logger.debug("filtered out");
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_logged(), 1);
    /// assert_eq!(metrics.drop_rate(), 0.0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn sampler_metrics(&self) -> Option<&SamplerMetrics> {
        self.sampler.as_deref().map(LogSampler::metrics)
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    pub fn fields(&self) -> &LogContext {
        &self.fields
    }

    pub fn core(&self) -> &FanOutCore {
        &self.core
    }

    #[track_caller]
    fn emit(&self, level: LogLevel, message: &str, context: Option<LogContext>) {
        if !self.core.enabled(level) {
            return;
        }

        if let Some(ref sampler) = self.sampler {
            if !sampler.should_sample(level, message) {
                self.metrics.record_sampled_out();
                return;
            }
        }

        let mut fields = self.fields.clone();
        if let Some(ref context) = context {
            fields.merge(context);
        }

        let mut entry = LogEntry::new(level, message).with_context(fields);
        if self.options.add_caller {
            entry = entry.with_caller(Caller::from_location(Location::caller()));
        }
        if self.options.stacktrace_level.is_some_and(|min| level >= min) {
            entry = entry.with_stack(Backtrace::force_capture().to_string());
        }

        self.core.write(&entry, &self.metrics);
    }

    fn terminate(&self, message: &str) -> ! {
        if let Err(e) = self.core.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before fatal exit: {}", e);
        }
        self.options.fatal_hook.run(message)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("core", &self.core)
            .field("sampler", &self.sampler)
            .field("options", &self.options)
            .field("fields", &self.fields)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // only the last clone reports; sinks flush themselves when dropped
        if Arc::strong_count(&self.metrics) > 1 {
            return;
        }
        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use level_split_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .destination(SeverityFilter::Exact(LogLevel::Warn), MemorySink::new())
///     .destination(SeverityFilter::Exact(LogLevel::Error), MemorySink::new())
///     .add_caller(false)
///     .stacktrace_level(None)
///     .fatal_hook(FatalHook::Panic)
///     .sampling(SamplingConfig::new(10, 5))
///     .build();
///
/// assert!(logger.is_enabled(LogLevel::Warn));
/// assert!(!logger.is_enabled(LogLevel::Info));
/// ```
pub struct LoggerBuilder {
    encoder: RecordEncoder,
    destinations: Vec<Destination>,
    options: LoggerOptions,
    sampling: Option<SamplingConfig>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            encoder: RecordEncoder::default(),
            destinations: Vec::new(),
            options: LoggerOptions::default(),
            sampling: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, encoder: RecordEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Add a sink guarded by `filter`
    #[must_use = "builder methods return a new value"]
    pub fn destination<S: Sink + 'static>(mut self, filter: SeverityFilter, sink: S) -> Self {
        self.destinations.push(Destination::new(filter, Box::new(sink)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn destinations(mut self, destinations: Vec<Destination>) -> Self {
        self.destinations.extend(destinations);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: LoggerOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.options.add_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: Option<LogLevel>) -> Self {
        self.options.stacktrace_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_hook(mut self, hook: FatalHook) -> Self {
        self.options.fatal_hook = hook;
        self
    }

    /// Enable sampling; the decision is made once per record before fan-out
    #[must_use = "builder methods return a new value"]
    pub fn sampling(mut self, config: SamplingConfig) -> Self {
        self.sampling = Some(config);
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new(FanOutCore::new(self.encoder, self.destinations), self.options);
        match self.sampling {
            Some(config) => logger.with_sampler(LogSampler::new(config)),
            None => logger,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
