//! Console sink writing encoded records to stdout or stderr

use crate::core::error::Result;
use crate::core::sink::Sink;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Sink for the process's standard streams
///
/// Each record is written while holding the stream lock, so records from
/// different threads never interleave.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout() -> Self {
        Self::with_target(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::with_target(ConsoleTarget::Stderr)
    }

    pub fn with_target(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(record)?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(record)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_sink_defaults_to_stdout() {
        let sink = ConsoleSink::new();
        assert_eq!(sink.target(), ConsoleTarget::Stdout);
        assert_eq!(sink.name(), "stdout");
        assert_eq!(ConsoleSink::stderr().name(), "stderr");
    }

    #[test]
    fn test_console_sink_write_and_flush() {
        let mut sink = ConsoleSink::stderr();
        assert!(sink.write(b"{\"msg\":\"console sink test\"}\n").is_ok());
        assert!(sink.flush().is_ok());
    }
}
