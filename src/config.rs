//! Logger configuration
//!
//! `Config` is plain data: it derives `Deserialize` with defaults for every
//! field, so it can be embedded in an application's own settings file.
//!
//! # Example
//!
//! ```
//! use level_split_logger::Config;
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "level": "debug",
//!     "file": { "log-dir": "/var/log/app", "filename": "app", "max-size": 10 }
//! }"#).unwrap();
//!
//! assert!(config.is_file_mode());
//! assert_eq!(config.file.max_size, 10);
//! assert_eq!(config.file.max_backups, 0);
//! ```

use crate::core::{
    EncoderConfig, LogLevel, LoggerOptions, OutputFormat, Result, SamplingConfig, TimestampFormat,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rotating file settings; an empty `filename` selects console output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileLogConfig {
    pub log_dir: PathBuf,
    /// Base name; each level writes to `<filename>.<LEVEL>.log`
    pub filename: String,
    /// Megabytes before rotation; 0 uses the default
    pub max_size: u64,
    /// Days to keep rotated files; 0 keeps them forever
    pub max_days: u64,
    /// Rotated files to keep; 0 keeps all
    pub max_backups: usize,
    pub compress: bool,
}

impl FileLogConfig {
    pub fn new(log_dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            filename: filename.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    #[must_use]
    pub fn with_max_days(mut self, days: u64) -> Self {
        self.max_days = days;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Minimum level for console output; unused in per-level file mode
    pub level: String,
    /// `json` or `console`
    pub format: String,
    pub time_format: TimestampFormat,
    pub disable_timestamp: bool,
    pub file: FileLogConfig,
    /// Stack traces from warn upwards and coloured console levels
    pub development: bool,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    pub disable_error_verbose: bool,
    pub sampling: Option<SamplingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            time_format: TimestampFormat::default(),
            disable_timestamp: false,
            file: FileLogConfig::default(),
            development: false,
            disable_caller: false,
            disable_stacktrace: false,
            disable_error_verbose: false,
            sampling: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileLogConfig) -> Self {
        self.file = file;
        self
    }

    #[must_use]
    pub fn with_development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disabled: bool) -> Self {
        self.disable_timestamp = disabled;
        self
    }

    #[must_use]
    pub fn with_disable_caller(mut self, disabled: bool) -> Self {
        self.disable_caller = disabled;
        self
    }

    #[must_use]
    pub fn with_disable_stacktrace(mut self, disabled: bool) -> Self {
        self.disable_stacktrace = disabled;
        self
    }

    #[must_use]
    pub fn with_disable_error_verbose(mut self, disabled: bool) -> Self {
        self.disable_error_verbose = disabled;
        self
    }

    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = Some(sampling);
        self
    }

    /// Per-level file output is selected by a non-empty file name
    pub fn is_file_mode(&self) -> bool {
        !self.file.filename.is_empty()
    }

    pub fn min_level(&self) -> Result<LogLevel> {
        self.level.parse()
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format.parse()
    }

    /// Check everything that can be checked without touching the filesystem
    ///
    /// The level is only parsed in console mode, where it is used.
    pub fn validate(&self) -> Result<()> {
        self.output_format()?;
        if !self.is_file_mode() {
            self.min_level()?;
        }
        if let Some(ref sampling) = self.sampling {
            sampling.validate()?;
        }
        self.time_format.validate()
    }

    pub fn encoder_config(&self) -> Result<EncoderConfig> {
        let format = self.output_format()?;
        self.time_format.validate()?;
        Ok(EncoderConfig {
            format,
            timestamp_format: self.time_format.clone(),
            disable_timestamp: self.disable_timestamp,
            error_verbose: !self.disable_error_verbose,
            color_levels: self.development && format == OutputFormat::Console,
        })
    }

    pub fn logger_options(&self) -> LoggerOptions {
        let stacktrace_level = if self.disable_stacktrace {
            None
        } else if self.development {
            Some(LogLevel::Warn)
        } else {
            Some(LogLevel::Error)
        };

        LoggerOptions {
            add_caller: !self.disable_caller,
            stacktrace_level,
            ..LoggerOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.min_level().unwrap(), LogLevel::Info);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);
        assert!(!config.is_file_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(
            r#"{"level":"WARN","development":true,"sampling":{"initial":5}}"#,
        )
        .unwrap();

        assert_eq!(config.min_level().unwrap(), LogLevel::Warn);
        assert!(config.development);
        let sampling = config.sampling.unwrap();
        assert_eq!(sampling.initial, 5);
        assert_eq!(sampling.thereafter, 100);
    }

    #[test]
    fn test_invalid_level_only_matters_in_console_mode() {
        let console = Config::new().with_level("verbose");
        assert!(matches!(
            console.validate(),
            Err(LoggerError::InvalidSeverity { .. })
        ));

        let file = console.with_file(FileLogConfig::new("/tmp/logs", "app"));
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_invalid_format() {
        let config = Config::new().with_format("xml");
        assert!(matches!(
            config.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(config.encoder_config().is_err());
    }

    #[test]
    fn test_unrenderable_time_layout() {
        let config: Config =
            serde_json::from_str(r#"{"level":"debug","time-format":{"Custom":"%Q"}}"#).unwrap();

        assert!(matches!(
            config.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            config.encoder_config(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_logger_options() {
        let options = Config::default().logger_options();
        assert!(options.add_caller);
        assert_eq!(options.stacktrace_level, Some(LogLevel::Error));

        let dev = Config::new().with_development(true).logger_options();
        assert_eq!(dev.stacktrace_level, Some(LogLevel::Warn));

        let bare = Config::new()
            .with_disable_caller(true)
            .with_disable_stacktrace(true)
            .logger_options();
        assert!(!bare.add_caller);
        assert_eq!(bare.stacktrace_level, None);
    }

    #[test]
    fn test_encoder_config() {
        let encoder = Config::new()
            .with_format("console")
            .with_development(true)
            .with_disable_error_verbose(true)
            .encoder_config()
            .unwrap();

        assert_eq!(encoder.format, OutputFormat::Console);
        assert!(encoder.color_levels);
        assert!(!encoder.error_verbose);

        let json = Config::new().with_development(true).encoder_config().unwrap();
        assert!(!json.color_levels);
    }
}
