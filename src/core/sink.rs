//! Sink trait for log output destinations

use super::error::Result;

/// A byte destination for encoded records
///
/// Each call to `write` receives one complete, newline-terminated record.
/// Sinks are owned by exactly one log core, which serializes access to them.
pub trait Sink: Send + Sync {
    fn write(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
