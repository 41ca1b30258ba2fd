//! Rotating file sink
//!
//! Writes records to one file and rotates it by size. The active file keeps
//! its name; rotated copies become `<name>.1`, `<name>.2`, ... with `.1`
//! always the newest. Backups can be gzip-compressed (`<name>.1.gz`) and are
//! pruned by count and by age.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECS_PER_DAY: u64 = 24 * 3600;

/// Limits applied to a rotating file
///
/// # Examples
///
/// ```
/// use level_split_logger::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age_days(30)
///     .with_compression(true);
///
/// assert_eq!(policy.max_size, 50 * 1024 * 1024);
/// assert_eq!(policy.max_age, Some(Duration::from_secs(30 * 24 * 3600)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Largest size in bytes the active file may reach
    pub max_size: u64,
    /// Remove backups older than this; `None` keeps them regardless of age
    pub max_age: Option<Duration>,
    /// Keep at most this many backups; 0 keeps all
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: 100 * BYTES_PER_MB,
            max_age: None,
            max_backups: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum file size in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(self, megabytes: u64) -> Self {
        self.with_max_size(megabytes.saturating_mul(BYTES_PER_MB))
    }

    /// 0 disables age-based removal
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age =
            (days > 0).then(|| Duration::from_secs(days.saturating_mul(SECS_PER_DAY)));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Option<Duration>) -> Self {
        self.max_age = age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// A rotated copy of the active file
#[derive(Debug, Clone)]
struct Backup {
    index: usize,
    path: PathBuf,
    compressed: bool,
}

/// Size-rotated file sink
///
/// # Examples
///
/// ```no_run
/// use level_split_logger::sinks::{RotatingFileSink, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size_mb(10).with_max_backups(5);
/// let sink = RotatingFileSink::with_policy("/var/log/app.INFO.log", policy).unwrap();
/// ```
pub struct RotatingFileSink {
    path: PathBuf,
    name: String,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open `path` for appending with the default policy
    ///
    /// # Errors
    ///
    /// Returns `SinkConstruction` if the directory or file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Open `path` for appending, creating its parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns `SinkConstruction` if the directory or file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| LoggerError::sink_construction(parent.display().to_string(), e))?;
        }

        let (file, current_size) =
            Self::open_file(&path).map_err(|e| LoggerError::sink_construction(name.clone(), e))?;

        Ok(Self {
            path,
            name,
            policy,
            file: Some(file),
            current_size,
        })
    }

    fn open_file(path: &Path) -> std::io::Result<(File, u64)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok((file, size))
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Close the active file, move it to `.1` and open a fresh one
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    &self.name,
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        // shift from the oldest down so no backup is overwritten
        let mut backups = self.backups()?;
        backups.sort_by(|a, b| b.index.cmp(&a.index));
        for backup in &backups {
            let target = self.backup_path(backup.index + 1, backup.compressed);
            fs::rename(&backup.path, &target).map_err(|e| {
                LoggerError::file_rotation(
                    backup.path.display().to_string(),
                    format!("Failed to shift backup: {}", e),
                )
            })?;
        }

        let newest = self.backup_path(1, false);
        if self.path.exists() {
            fs::rename(&self.path, &newest).map_err(|e| {
                LoggerError::file_rotation(
                    &self.name,
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
            if self.policy.compress {
                compress_file(&newest, &self.backup_path(1, true))?;
            }
        }

        let (file, size) = Self::open_file(&self.path).map_err(|e| {
            LoggerError::file_rotation(&self.name, format!("Failed to create new log file: {}", e))
        })?;
        self.file = Some(file);
        self.current_size = size;

        self.prune()
    }

    /// Remove backups beyond the count limit or older than the age limit
    fn prune(&self) -> Result<()> {
        let now = SystemTime::now();
        for backup in self.backups()? {
            let over_count = self.policy.max_backups > 0 && backup.index > self.policy.max_backups;
            let too_old = match self.policy.max_age {
                Some(max_age) => fs::metadata(&backup.path)
                    .and_then(|m| m.modified())
                    .map(|modified| {
                        now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age
                    })
                    .unwrap_or(false),
                None => false,
            };

            if over_count || too_old {
                if let Err(e) = fs::remove_file(&backup.path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove old backup {}: {}",
                        backup.path.display(),
                        e
                    );
                }
            }
        }
        Ok(())
    }

    fn backup_path(&self, index: usize, compressed: bool) -> PathBuf {
        let suffix = if compressed { ".gz" } else { "" };
        let mut file_name = self.path.file_name().unwrap_or_default().to_os_string();
        file_name.push(format!(".{}{}", index, suffix));
        self.path.with_file_name(file_name)
    }

    /// Backups currently on disk, in no particular order
    fn backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let prefix = format!(
            "{}.",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
        );

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let Some(suffix) = file_name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
                continue;
            };
            let (digits, compressed) = match suffix.strip_suffix(".gz") {
                Some(digits) => (digits, true),
                None => (suffix, false),
            };
            if let Ok(index) = digits.parse::<usize>() {
                if index > 0 {
                    backups.push(Backup {
                        index,
                        path: entry.path(),
                        compressed,
                    });
                }
            }
        }
        Ok(backups)
    }
}

impl Sink for RotatingFileSink {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        let len = record.len() as u64;
        if len > self.policy.max_size {
            return Err(LoggerError::writer(format!(
                "write length {} exceeds maximum file size {} for '{}'",
                len, self.policy.max_size, self.name
            )));
        }

        if self.file.is_none() || self.current_size.saturating_add(len) > self.policy.max_size {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.file.is_none() {
                    let (file, size) = Self::open_file(&self.path).map_err(|reopen| {
                        LoggerError::sink_construction(self.name.clone(), reopen)
                    })?;
                    self.file = Some(file);
                    self.current_size = size;
                }
            }
        }

        match self.file {
            Some(ref mut file) => {
                file.write_all(record).map_err(|e| {
                    LoggerError::io_operation(
                        "write log record",
                        format!("Failed to write to '{}'", self.name),
                        e,
                    )
                })?;
                self.current_size += len;
                Ok(())
            }
            None => Err(LoggerError::writer("Writer not initialized")),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::io_operation(
                    "flush log file",
                    format!("Failed to flush '{}'", self.name),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}

/// Gzip `source` into `target`, removing `source` only once `target` is complete
fn compress_file(source: &Path, target: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let mut temp_name = target.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = target.with_file_name(temp_name);

    let compress = || -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(source)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_path)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp_path, target)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&temp_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress '{}'", source.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(source) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            source.display(),
            e
        );
    }
    Ok(())
}
