//! Record encoder turning a [`LogEntry`] into one line of bytes
//!
//! Two layouts are supported:
//! - Json: one object per line, keys `level`, `ts`, `caller`, `msg`, the
//!   structured fields, then `stacktrace`
//! - Console: tab-separated `ts level caller msg {fields}` for humans

use super::error::{LoggerError, Result};
use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use std::io::Write;
use std::str::FromStr;

pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "ts";
pub const CALLER_KEY: &str = "caller";
pub const MESSAGE_KEY: &str = "msg";
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Output layout for encoded records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Console,
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "json" => Ok(OutputFormat::Json),
            "console" | "text" => Ok(OutputFormat::Console),
            other => Err(LoggerError::config(
                "format",
                format!("unknown output format '{}', expected json or console", other),
            )),
        }
    }
}

/// Encoding rules shared by every core of a composed logger
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub disable_timestamp: bool,
    /// Emit `<key>Verbose` with the source chain for error fields
    pub error_verbose: bool,
    /// Colour level names in the console layout
    pub color_levels: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            timestamp_format: TimestampFormat::default(),
            disable_timestamp: false,
            error_verbose: true,
            color_levels: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordEncoder {
    config: EncoderConfig,
}

impl RecordEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode one record, newline terminated
    pub fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(256);
        match self.config.format {
            OutputFormat::Json => self.encode_json(entry, &mut buf)?,
            OutputFormat::Console => self.encode_console(entry, &mut buf)?,
        }
        buf.push(b'\n');
        Ok(buf)
    }

    fn encode_json(&self, entry: &LogEntry, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(b'{');
        write_key(buf, LEVEL_KEY, true)?;
        serde_json::to_writer(&mut *buf, entry.level.as_lower_str())?;

        if !self.config.disable_timestamp {
            write_key(buf, TIME_KEY, false)?;
            let ts = self.config.timestamp_format.format(&entry.timestamp)?;
            if self.config.timestamp_format.is_numeric() {
                buf.extend_from_slice(ts.as_bytes());
            } else {
                serde_json::to_writer(&mut *buf, &ts)?;
            }
        }

        if let Some(caller) = entry.caller {
            write_key(buf, CALLER_KEY, false)?;
            serde_json::to_writer(&mut *buf, &caller.to_string())?;
        }

        write_key(buf, MESSAGE_KEY, false)?;
        serde_json::to_writer(&mut *buf, &entry.message)?;

        for (key, value) in entry.context.iter() {
            write_key(buf, key, false)?;
            serde_json::to_writer(&mut *buf, &value.to_json_value())?;
            if let Some(verbose) = self.verbose_error(value) {
                write_key(buf, &format!("{}Verbose", key), false)?;
                serde_json::to_writer(&mut *buf, &verbose)?;
            }
        }

        if let Some(ref stack) = entry.stack {
            write_key(buf, STACKTRACE_KEY, false)?;
            serde_json::to_writer(&mut *buf, stack)?;
        }

        buf.push(b'}');
        Ok(())
    }

    fn encode_console(&self, entry: &LogEntry, buf: &mut Vec<u8>) -> Result<()> {
        let mut columns: Vec<String> = Vec::with_capacity(5);

        if !self.config.disable_timestamp {
            columns.push(self.config.timestamp_format.format(&entry.timestamp)?);
        }
        columns.push(self.level_label(entry));
        if let Some(caller) = entry.caller {
            columns.push(caller.to_string());
        }
        columns.push(escape_control(&entry.message));

        if !entry.context.is_empty() {
            let mut fields = serde_json::Map::new();
            for (key, value) in entry.context.iter() {
                fields.insert(key.to_string(), value.to_json_value());
                if let Some(verbose) = self.verbose_error(value) {
                    fields.insert(format!("{}Verbose", key), serde_json::Value::String(verbose));
                }
            }
            columns.push(serde_json::to_string(&serde_json::Value::Object(fields))?);
        }

        buf.write_all(columns.join("\t").as_bytes())?;

        if let Some(ref stack) = entry.stack {
            buf.push(b'\n');
            buf.write_all(stack.as_bytes())?;
        }
        Ok(())
    }

    fn level_label(&self, entry: &LogEntry) -> String {
        #[cfg(feature = "console")]
        if self.config.color_levels {
            use colored::Colorize;
            return entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string();
        }
        entry.level.to_str().to_string()
    }

    fn verbose_error(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Error { message, chain }
                if self.config.error_verbose && !chain.is_empty() =>
            {
                let mut verbose = message.clone();
                for cause in chain {
                    verbose.push_str(": ");
                    verbose.push_str(cause);
                }
                Some(verbose)
            }
            _ => None,
        }
    }
}

/// Escape the characters that would split a console record into fake ones
fn escape_control(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn write_key(buf: &mut Vec<u8>, key: &str, first: bool) -> Result<()> {
    if !first {
        buf.push(b',');
    }
    serde_json::to_writer(&mut *buf, key)?;
    buf.push(b':');
    Ok(())
}
