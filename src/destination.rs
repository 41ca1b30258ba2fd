//! Destination set construction
//!
//! Turns a [`Config`] into the ordered list of filtered sinks a logger is
//! composed from. Two shapes exist:
//!
//! - console mode: one stdout sink behind `Threshold(level)`
//! - file mode: one rotating file per level, each behind `Exact(level)`,
//!   in `LogLevel::ALL` order

use crate::config::{Config, FileLogConfig};
use crate::core::{Destination, LogLevel, LoggerError, Result, SeverityFilter, Sink};
use crate::sinks::{ConsoleSink, RotatingFileSink, RotationPolicy};
use std::path::PathBuf;

/// Rotation size used when `max_size` is 0
pub const DEFAULT_LOG_MAX_SIZE_MB: u64 = 100;

/// `<base>.<LEVEL>.log`
pub fn level_file_name(base: &str, level: LogLevel) -> String {
    format!("{}.{}.log", base, level.to_str())
}

/// Full path of the file receiving records of `level`
pub fn level_file_path(file: &FileLogConfig, level: LogLevel) -> PathBuf {
    file.log_dir.join(level_file_name(&file.filename, level))
}

pub fn rotation_policy(file: &FileLogConfig) -> RotationPolicy {
    let max_size = if file.max_size == 0 {
        DEFAULT_LOG_MAX_SIZE_MB
    } else {
        file.max_size
    };
    RotationPolicy::new()
        .with_max_size_mb(max_size)
        .with_max_age_days(file.max_days)
        .with_max_backups(file.max_backups)
        .with_compression(file.compress)
}

/// Build the destinations selected by `config`
///
/// # Errors
///
/// - `InvalidLogTarget` if a per-level path is an existing directory
/// - `SinkConstruction` if a file cannot be opened
/// - `InvalidSeverity` if the level does not parse in console mode
pub fn build_destinations(config: &Config) -> Result<Vec<Destination>> {
    if config.is_file_mode() {
        build_file_destinations(&config.file)
    } else {
        let min = config.min_level()?;
        Ok(vec![Destination::new(
            SeverityFilter::Threshold(min),
            Box::new(ConsoleSink::stdout()),
        )])
    }
}

fn build_file_destinations(file: &FileLogConfig) -> Result<Vec<Destination>> {
    let paths: Vec<(LogLevel, PathBuf)> = LogLevel::ALL
        .iter()
        .map(|&level| (level, level_file_path(file, level)))
        .collect();

    // reject before creating any file so a bad target leaves nothing behind
    if let Some((_, path)) = paths.iter().find(|(_, path)| path.is_dir()) {
        return Err(LoggerError::invalid_log_target(path.clone()));
    }

    let policy = rotation_policy(file);
    paths
        .into_iter()
        .map(|(level, path)| {
            let sink = RotatingFileSink::with_policy(&path, policy.clone())?;
            Ok(Destination::new(SeverityFilter::Exact(level), Box::new(sink)))
        })
        .collect()
}

/// Bind caller-supplied sinks to filters
///
/// One sink gets `Threshold(level)` from the config; five sinks get
/// `Exact(level)` in `LogLevel::ALL` order.
///
/// # Example
///
/// ```
/// use level_split_logger::{build_destinations_with_sinks, Config, MemorySink, SeverityFilter, LogLevel, Sink};
///
/// let sinks: Vec<Box<dyn Sink>> = vec![Box::new(MemorySink::new())];
/// let destinations = build_destinations_with_sinks(&Config::new().with_level("warn"), sinks).unwrap();
///
/// assert_eq!(destinations[0].filter, SeverityFilter::Threshold(LogLevel::Warn));
/// ```
pub fn build_destinations_with_sinks(
    config: &Config,
    sinks: Vec<Box<dyn Sink>>,
) -> Result<Vec<Destination>> {
    match sinks.len() {
        1 => {
            let min = config.min_level()?;
            Ok(sinks
                .into_iter()
                .map(|sink| Destination::new(SeverityFilter::Threshold(min), sink))
                .collect())
        }
        n if n == LogLevel::ALL.len() => Ok(LogLevel::ALL
            .iter()
            .zip(sinks)
            .map(|(&level, sink)| Destination::new(SeverityFilter::Exact(level), sink))
            .collect()),
        n => Err(LoggerError::config(
            "sinks",
            format!(
                "expected 1 sink or {} per-level sinks, got {}",
                LogLevel::ALL.len(),
                n
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::fs;
    use tempfile::tempdir;

    fn memory_sinks(n: usize) -> Vec<Box<dyn Sink>> {
        (0..n).map(|_| Box::new(MemorySink::new()) as Box<dyn Sink>).collect()
    }

    #[test]
    fn test_level_file_name() {
        assert_eq!(level_file_name("app", LogLevel::Warn), "app.WARN.log");
        let file = FileLogConfig::new("/var/log", "svc");
        assert_eq!(
            level_file_path(&file, LogLevel::Debug),
            PathBuf::from("/var/log/svc.DEBUG.log")
        );
    }

    #[test]
    fn test_rotation_policy_default_size() {
        let policy = rotation_policy(&FileLogConfig::new("logs", "app"));
        assert_eq!(policy.max_size, DEFAULT_LOG_MAX_SIZE_MB * 1024 * 1024);
        assert_eq!(policy.max_age, None);

        let file = FileLogConfig::new("logs", "app")
            .with_max_size(1)
            .with_max_backups(3);
        let policy = rotation_policy(&file);
        assert_eq!(policy.max_size, 1024 * 1024);
        assert_eq!(policy.max_backups, 3);
    }

    #[test]
    fn test_console_mode_single_threshold() {
        let destinations = build_destinations(&Config::new().with_level("debug")).unwrap();
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].filter, SeverityFilter::Threshold(LogLevel::Debug));
        assert_eq!(destinations[0].sink.name(), "stdout");
    }

    #[test]
    fn test_console_mode_bad_level() {
        let result = build_destinations(&Config::new().with_level("loud"));
        assert!(matches!(result, Err(LoggerError::InvalidSeverity { .. })));
    }

    #[test]
    fn test_file_mode_one_exact_sink_per_level() {
        let dir = tempdir().unwrap();
        let config = Config::new()
            .with_level("not consulted in file mode")
            .with_file(FileLogConfig::new(dir.path(), "app"));

        let destinations = build_destinations(&config).unwrap();

        let filters: Vec<SeverityFilter> = destinations.iter().map(|d| d.filter).collect();
        let expected: Vec<SeverityFilter> =
            LogLevel::ALL.iter().map(|&l| SeverityFilter::Exact(l)).collect();
        assert_eq!(filters, expected);

        for level in LogLevel::ALL {
            assert!(dir.path().join(level_file_name("app", level)).is_file());
        }
    }

    #[test]
    fn test_directory_target_is_rejected_before_opening() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("app.ERROR.log")).unwrap();

        let config = Config::new().with_file(FileLogConfig::new(dir.path(), "app"));
        let result = build_destinations(&config);

        match result {
            Err(LoggerError::InvalidLogTarget { path }) => {
                assert_eq!(path, dir.path().join("app.ERROR.log"));
            }
            other => panic!("expected InvalidLogTarget, got {:?}", other),
        }
        assert!(!dir.path().join("app.DEBUG.log").exists());
    }

    #[test]
    fn test_with_sinks_counts() {
        let config = Config::new();

        let one = build_destinations_with_sinks(&config, memory_sinks(1)).unwrap();
        assert_eq!(one[0].filter, SeverityFilter::Threshold(LogLevel::Info));

        let five = build_destinations_with_sinks(&config, memory_sinks(5)).unwrap();
        assert_eq!(five[4].filter, SeverityFilter::Exact(LogLevel::Fatal));

        for n in [0, 2, 6] {
            assert!(matches!(
                build_destinations_with_sinks(&config, memory_sinks(n)),
                Err(LoggerError::InvalidConfiguration { .. })
            ));
        }
    }
}
