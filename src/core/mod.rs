//! Core logger types and traits

pub mod encoder;
pub mod error;
pub mod filter;
pub mod log_context;
pub mod log_core;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sampling;
pub mod sink;
pub mod timestamp;

pub use encoder::{EncoderConfig, OutputFormat, RecordEncoder};
pub use error::{LoggerError, Result};
pub use filter::SeverityFilter;
pub use log_context::{FieldValue, LogContext};
pub use log_core::{Destination, FanOutCore, LogCore};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{FatalHook, Logger, LoggerBuilder, LoggerOptions};
pub use metrics::LoggerMetrics;
pub use sampling::{LogSampler, SamplerMetrics, SamplingConfig};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
