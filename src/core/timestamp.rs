//! Timestamp formatting utilities
//!
//! Records are stamped in local time. The default layout is
//! `2006-01-02 15:04:05` style (`%Y-%m-%d %H:%M:%S`).

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Layout of the timestamp written with each record
///
/// # Examples
///
/// ```
/// use level_split_logger::core::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let dt = tz.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::default().format(&dt).unwrap(), "2025-01-08 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45`
    #[default]
    DateTime,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+08:00`
    Iso8601,

    /// RFC 3339: `2025-01-08T10:30:45+08:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Reject custom layouts that are empty or hold an unknown specifier
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(layout) = self {
            if layout.is_empty() {
                return Err(LoggerError::config("time-format", "custom layout is empty"));
            }
            if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "time-format",
                    format!("invalid custom layout '{}'", layout),
                ));
            }
        }
        Ok(())
    }

    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let layout = match self {
            TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3f%:z",
            TimestampFormat::Rfc3339 => return Ok(datetime.to_rfc3339()),
            TimestampFormat::UnixMillis => return Ok(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(layout) => layout.as_str(),
        };

        let mut out = String::with_capacity(32);
        write!(out, "{}", datetime.format(layout)).map_err(|_| {
            LoggerError::writer(format!("cannot render timestamp layout '{}'", layout))
        })?;
        Ok(out)
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}
