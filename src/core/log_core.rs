//! Log cores and the fan-out core that merges them
//!
//! A [`LogCore`] pairs one sink with one [`SeverityFilter`]. The
//! [`FanOutCore`] offers every record to all of its cores; each core decides
//! on its own whether to write it.

use super::encoder::RecordEncoder;
use super::error::{LoggerError, Result};
use super::filter::SeverityFilter;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use parking_lot::Mutex;
use std::fmt;

/// A severity filter bound to the sink it guards
pub struct Destination {
    pub filter: SeverityFilter,
    pub sink: Box<dyn Sink>,
}

impl Destination {
    pub fn new(filter: SeverityFilter, sink: Box<dyn Sink>) -> Self {
        Self { filter, sink }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("filter", &self.filter)
            .field("sink", &self.sink.name())
            .finish()
    }
}

pub struct LogCore {
    filter: SeverityFilter,
    sink: Mutex<Box<dyn Sink>>,
}

impl LogCore {
    pub fn new(destination: Destination) -> Self {
        Self {
            filter: destination.filter,
            sink: Mutex::new(destination.sink),
        }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.filter.accepts(level)
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }

    /// Write an encoded record if the filter accepts `level`
    ///
    /// Returns `Ok(false)` when the record was rejected.
    pub fn write(&self, level: LogLevel, record: &[u8]) -> Result<bool> {
        if !self.enabled(level) {
            return Ok(false);
        }
        self.sink.lock().write(record)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }
}

impl fmt::Debug for LogCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCore")
            .field("filter", &self.filter)
            .field("sink", &self.sink_name())
            .finish()
    }
}

/// All cores of one composed logger sharing a single encoder
pub struct FanOutCore {
    encoder: RecordEncoder,
    cores: Vec<LogCore>,
}

impl FanOutCore {
    pub fn new(encoder: RecordEncoder, destinations: Vec<Destination>) -> Self {
        Self {
            encoder,
            cores: destinations.into_iter().map(LogCore::new).collect(),
        }
    }

    /// True if any core would accept a record at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.cores.iter().any(|core| core.enabled(level))
    }

    pub fn cores(&self) -> &[LogCore] {
        &self.cores
    }

    pub fn encoder(&self) -> &RecordEncoder {
        &self.encoder
    }

    /// Encode `entry` once and write it to every accepting core
    ///
    /// Every core is attempted even when an earlier one fails or panics.
    /// Failures are reported on stderr and counted as one dropped record.
    pub fn write(&self, entry: &LogEntry, metrics: &LoggerMetrics) {
        if !self.enabled(entry.level) {
            return;
        }

        let record = match self.encoder.encode(entry) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to encode record: {}", e);
                metrics.record_dropped();
                return;
            }
        };

        let mut has_error = false;
        for (idx, core) in self.cores.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                core.write(entry.level, &record)
            }));

            match result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Core #{} ({}) failed: {}", idx, core.filter, e);
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Core #{} ({}) panicked: {}. \
                         Other cores continue to function.",
                        idx,
                        core.filter,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }
    }

    /// Flush every sink, returning the first error after trying all of them
    pub fn flush(&self) -> Result<()> {
        let mut first_error: Option<LoggerError> = None;
        for core in &self.cores {
            if let Err(e) = core.flush() {
                eprintln!("[LOGGER ERROR] Flush failed for {}: {}", core.sink_name(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for FanOutCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOutCore")
            .field("encoder", &self.encoder)
            .field("cores", &self.cores)
            .finish()
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    struct FailingSink;

    impl Sink for FailingSink {
        fn write(&mut self, _record: &[u8]) -> Result<()> {
            Err(LoggerError::writer("simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::writer("simulated flush failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write(&mut self, _record: &[u8]) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn per_level_sinks() -> (Vec<MemorySink>, FanOutCore) {
        let sinks: Vec<MemorySink> = LogLevel::ALL.iter().map(|_| MemorySink::new()).collect();
        let destinations = LogLevel::ALL
            .iter()
            .zip(&sinks)
            .map(|(level, sink)| {
                Destination::new(SeverityFilter::Exact(*level), Box::new(sink.clone()))
            })
            .collect();
        (sinks, FanOutCore::new(RecordEncoder::default(), destinations))
    }

    #[test]
    fn test_exact_cores_route_one_level_each() {
        let (sinks, core) = per_level_sinks();
        let metrics = LoggerMetrics::new();

        for level in LogLevel::ALL {
            core.write(&LogEntry::new(level, level.to_str()), &metrics);
        }

        for (level, sink) in LogLevel::ALL.iter().zip(&sinks) {
            let lines = sink.lines();
            assert_eq!(lines.len(), 1, "sink for {} got {:?}", level, lines);
            assert!(lines[0].contains(&format!("\"level\":\"{}\"", level.as_lower_str())));
        }
        assert_eq!(metrics.total_logged(), 5);
    }

    #[test]
    fn test_threshold_core_and_enabled() {
        let sink = MemorySink::new();
        let core = FanOutCore::new(
            RecordEncoder::default(),
            vec![Destination::new(
                SeverityFilter::Threshold(LogLevel::Warn),
                Box::new(sink.clone()),
            )],
        );
        let metrics = LoggerMetrics::new();

        assert!(!core.enabled(LogLevel::Info));
        assert!(core.enabled(LogLevel::Error));

        core.write(&LogEntry::new(LogLevel::Info, "skipped"), &metrics);
        core.write(&LogEntry::new(LogLevel::Error, "kept"), &metrics);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("kept"));
        assert_eq!(metrics.total_logged(), 1);
        assert_eq!(metrics.dropped_count(), 0);
    }

    #[test]
    fn test_failing_core_does_not_block_others() {
        let healthy = MemorySink::new();
        let core = FanOutCore::new(
            RecordEncoder::default(),
            vec![
                Destination::new(
                    SeverityFilter::Threshold(LogLevel::Debug),
                    Box::new(FailingSink),
                ),
                Destination::new(
                    SeverityFilter::Threshold(LogLevel::Debug),
                    Box::new(PanickingSink),
                ),
                Destination::new(
                    SeverityFilter::Threshold(LogLevel::Debug),
                    Box::new(healthy.clone()),
                ),
            ],
        );
        let metrics = LoggerMetrics::new();

        core.write(&LogEntry::new(LogLevel::Info, "still delivered"), &metrics);

        assert_eq!(healthy.lines().len(), 1);
        assert_eq!(metrics.dropped_count(), 1);
    }

    #[test]
    fn test_encode_failure_is_counted_not_raised() {
        use crate::core::encoder::EncoderConfig;
        use crate::core::timestamp::TimestampFormat;

        let sink = MemorySink::new();
        let encoder = RecordEncoder::new(EncoderConfig {
            timestamp_format: TimestampFormat::Custom("%Q".to_string()),
            ..Default::default()
        });
        let core = FanOutCore::new(
            encoder,
            vec![Destination::new(
                SeverityFilter::Threshold(LogLevel::Debug),
                Box::new(sink.clone()),
            )],
        );
        let metrics = LoggerMetrics::new();

        core.write(&LogEntry::new(LogLevel::Info, "hello"), &metrics);

        assert!(sink.lines().is_empty());
        assert_eq!(metrics.dropped_count(), 1);
    }

    #[test]
    fn test_flush_reports_first_error() {
        let core = FanOutCore::new(
            RecordEncoder::default(),
            vec![
                Destination::new(
                    SeverityFilter::Exact(LogLevel::Info),
                    Box::new(MemorySink::new()),
                ),
                Destination::new(SeverityFilter::Exact(LogLevel::Warn), Box::new(FailingSink)),
            ],
        );
        assert!(matches!(core.flush(), Err(LoggerError::WriterError(_))));
    }

    #[test]
    fn test_debug_lists_filters() {
        let (_sinks, core) = per_level_sinks();
        let debug_str = format!("{:?}", core);
        assert!(debug_str.contains("Exact(Fatal)"));
        assert!(debug_str.contains("memory"));
    }
}
