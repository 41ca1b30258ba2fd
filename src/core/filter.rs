//! Severity filters deciding which levels a log core accepts

use super::log_level::LogLevel;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityFilter {
    /// Accepts `level >= min`
    Threshold(LogLevel),
    /// Accepts exactly one level
    Exact(LogLevel),
}

impl SeverityFilter {
    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        match *self {
            SeverityFilter::Threshold(min) => level >= min,
            SeverityFilter::Exact(only) => level == only,
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::Threshold(min) => write!(f, ">={}", min),
            SeverityFilter::Exact(only) => write!(f, "={}", only),
        }
    }
}
