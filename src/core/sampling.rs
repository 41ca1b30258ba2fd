//! Log sampling for high-volume scenarios
//!
//! Caps repeated records while ensuring critical logs are never dropped.
//! Within each tick, for every (level, message) pair the first `initial`
//! records are logged and after that only every `thereafter`-th one.
//!
//! # Example
//!
//! ```
//! use level_split_logger::{LogLevel, LogSampler, SamplingConfig};
//!
//! let sampler = LogSampler::new(SamplingConfig {
//!     initial: 2,
//!     thereafter: 0,
//!     tick_ms: 60_000,
//!     always_sample: vec![LogLevel::Fatal],
//! });
//!
//! assert!(sampler.should_sample(LogLevel::Info, "cache miss"));
//! assert!(sampler.should_sample(LogLevel::Info, "cache miss"));
//! assert!(!sampler.should_sample(LogLevel::Info, "cache miss"));
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const BUCKETS_PER_LEVEL: usize = 1024;

/// Configuration for log sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SamplingConfig {
    /// Records logged per tick before sampling starts
    pub initial: u64,

    /// After `initial`, log every `thereafter`-th record; 0 drops the rest
    pub thereafter: u64,

    /// Length of one sampling window in milliseconds
    pub tick_ms: u64,

    /// Log levels that are never sampled (always logged)
    pub always_sample: Vec<LogLevel>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
            tick_ms: 1000,
            always_sample: vec![LogLevel::Error, LogLevel::Fatal],
        }
    }
}

impl SamplingConfig {
    pub fn new(initial: u64, thereafter: u64) -> Self {
        Self {
            initial,
            thereafter,
            ..Default::default()
        }
    }

    /// Set the levels that should always be logged
    #[must_use]
    pub fn with_always_sample(mut self, levels: Vec<LogLevel>) -> Self {
        self.always_sample = levels;
        self
    }

    #[must_use]
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(LoggerError::config("sampling", "tick_ms must be greater than 0"));
        }
        Ok(())
    }
}

/// Metrics for sampling observability
///
/// # Example
///
/// ```
/// use level_split_logger::SamplerMetrics;
///
/// let metrics = SamplerMetrics::new();
/// assert_eq!(metrics.sampled_count(), 0);
/// assert_eq!(metrics.dropped_count(), 0);
/// ```
#[derive(Debug)]
pub struct SamplerMetrics {
    sampled_count: AtomicU64,
    dropped_count: AtomicU64,
}

impl SamplerMetrics {
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.sampled_count() + self.dropped_count()
    }

    #[inline]
    pub(crate) fn record_sampled(&self) {
        self.sampled_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Share of records that passed sampling; 1.0 before any record
    pub fn effective_sample_rate(&self) -> f64 {
        let total = self.total_count() as f64;
        if total == 0.0 {
            1.0
        } else {
            self.sampled_count() as f64 / total
        }
    }

    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-bucket count that restarts at the beginning of each tick
#[derive(Debug, Default)]
struct WindowCounter {
    reset_at: AtomicU64,
    count: AtomicU64,
}

impl WindowCounter {
    fn inc_check_reset(&self, now: u64, tick: u64) -> u64 {
        let reset_at = self.reset_at.load(Ordering::Acquire);
        if reset_at > now {
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }

        self.count.store(1, Ordering::Release);
        if self
            .reset_at
            .compare_exchange(
                reset_at,
                now.saturating_add(tick),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            // another thread opened the window first
            return self.count.fetch_add(1, Ordering::AcqRel) + 1;
        }
        1
    }
}

/// Log sampler deciding once per record, before fan-out
///
/// # Thread Safety
///
/// Counters are atomics; no lock is taken on the logging path.
pub struct LogSampler {
    config: SamplingConfig,
    metrics: SamplerMetrics,
    counters: Vec<WindowCounter>,
    epoch: Instant,
}

impl LogSampler {
    pub fn new(config: SamplingConfig) -> Self {
        let mut counters = Vec::with_capacity(LogLevel::ALL.len() * BUCKETS_PER_LEVEL);
        counters.resize_with(LogLevel::ALL.len() * BUCKETS_PER_LEVEL, WindowCounter::default);
        Self {
            config,
            metrics: SamplerMetrics::new(),
            counters,
            epoch: Instant::now(),
        }
    }

    /// Returns `true` if the record should be logged
    pub fn should_sample(&self, level: LogLevel, message: &str) -> bool {
        // 1 keeps the first window's reset_at (0) strictly in the past
        let now = self.epoch.elapsed().as_nanos() as u64 + 1;
        self.should_sample_at(level, message, now)
    }

    fn should_sample_at(&self, level: LogLevel, message: &str, now: u64) -> bool {
        if self.config.always_sample.contains(&level) {
            self.metrics.record_sampled();
            return true;
        }

        let tick = self.config.tick_ms.max(1).saturating_mul(1_000_000);
        let n = self.counter(level, message).inc_check_reset(now, tick);

        let keep = n <= self.config.initial
            || (self.config.thereafter > 0
                && (n - self.config.initial) % self.config.thereafter == 0);

        if keep {
            self.metrics.record_sampled();
        } else {
            self.metrics.record_dropped();
        }
        keep
    }

    fn counter(&self, level: LogLevel, message: &str) -> &WindowCounter {
        let mut hasher = DefaultHasher::new();
        message.hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % BUCKETS_PER_LEVEL;
        &self.counters[level.index() * BUCKETS_PER_LEVEL + bucket]
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }
}

impl std::fmt::Debug for LogSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSampler")
            .field("config", &self.config)
            .field("metrics", &self.metrics)
            .finish()
    }
}
