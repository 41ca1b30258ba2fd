//! Logging macros for ergonomic log message formatting.
//!
//! Two families are provided:
//!
//! - `log!`, `debug!` .. `fatal!` take an explicit logger (a [`Logger`] or a
//!   [`LoggerHandle`]) as their first argument
//! - `debugf!` .. `fatalf!` write through the process-wide logger
//!
//! Formatting is skipped when no sink accepts the level.
//!
//! # Examples
//!
//! ```
//! use level_split_logger::prelude::*;
//! use level_split_logger::info;
//!
//! let logger = Logger::builder()
//!     .destination(SeverityFilter::Threshold(LogLevel::Info), MemorySink::new())
//!     .build();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```
//!
//! [`Logger`]: crate::Logger
//! [`LoggerHandle`]: crate::LoggerHandle

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use level_split_logger::prelude::*;
/// # let logger = Logger::builder().destination(SeverityFilter::Threshold(LogLevel::Info), MemorySink::new()).build();
/// use level_split_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, flush, then run the fatal hook.
///
/// The expression has type `!`.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}

/// Format and log at debug level through the process-wide logger.
///
/// # Examples
///
/// ```no_run
/// use level_split_logger::{debugf, init_logger, Config};
///
/// init_logger(&Config::new().with_level("debug")).unwrap();
/// debugf!("cache size {}", 42);
/// ```
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::log_fmt($crate::LogLevel::Debug, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::log_fmt($crate::LogLevel::Info, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::log_fmt($crate::LogLevel::Warn, format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::log_fmt($crate::LogLevel::Error, format_args!($($arg)+))
    };
}

/// Format and log at fatal level through the process-wide logger, then exit.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatal(format!($($arg)+))
    };
}
