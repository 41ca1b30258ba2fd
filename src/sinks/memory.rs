//! In-memory sink
//!
//! Clones share one buffer, so a test can hand one clone to a logger and
//! read what was written through another.

use crate::core::error::Result;
use crate::core::sink::Sink;
use parking_lot::Mutex;
use std::sync::Arc;

/// # Example
///
/// ```
/// use level_split_logger::sinks::MemorySink;
/// use level_split_logger::Sink;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.write(b"one\n").unwrap();
/// writer.write(b"two\n").unwrap();
///
/// assert_eq!(sink.lines(), vec!["one", "two"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Written records split on newlines
    pub fn lines(&self) -> Vec<String> {
        self.contents_string().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
