//! Criterion benchmarks for level_split_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use level_split_logger::prelude::*;
use level_split_logger::{EncoderConfig, LogEntry, LogSampler, OutputFormat, RecordEncoder};
use std::sync::Arc;

/// Sink that discards everything, isolating logger overhead from I/O
struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _record: &[u8]) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn threshold_logger(min: LogLevel) -> Logger {
    Logger::builder()
        .destination(SeverityFilter::Threshold(min), NullSink)
        .stacktrace_level(None)
        .build()
}

fn per_level_logger() -> Logger {
    let mut builder = Logger::builder().stacktrace_level(None);
    for level in LogLevel::ALL {
        builder = builder.destination(SeverityFilter::Exact(level), NullSink);
    }
    builder.build()
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_sync_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_logging");
    group.throughput(Throughput::Elements(1));

    let logger = threshold_logger(LogLevel::Debug);

    group.bench_function("info", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
        });
    });

    group.bench_function("info_with_context", |b| {
        b.iter(|| {
            logger.info_with_context(
                black_box("Request handled"),
                LogContext::new().with_field("status", 200).with_field("path", "/health"),
            );
        });
    });

    let no_caller = Logger::builder()
        .destination(SeverityFilter::Threshold(LogLevel::Debug), NullSink)
        .add_caller(false)
        .stacktrace_level(None)
        .build();
    group.bench_function("info_without_caller", |b| {
        b.iter(|| {
            no_caller.info(black_box("Info message"));
        });
    });

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    group.throughput(Throughput::Elements(1));

    let single = threshold_logger(LogLevel::Debug);
    let per_level = per_level_logger();

    group.bench_function("single_threshold_core", |b| {
        b.iter(|| single.warn(black_box("Warn message")));
    });

    group.bench_function("five_exact_cores", |b| {
        b.iter(|| per_level.warn(black_box("Warn message")));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    let logger = Arc::new(threshold_logger(LogLevel::Info));

    group.bench_function("4_threads_x_100", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            logger.info("Concurrent message");
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(LogLevel::Info, "Encoded message")
        .with_context(LogContext::new().with_field("user_id", 42).with_field("action", "login"));

    let json = RecordEncoder::default();
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.encode(black_box(&entry))));
    });

    let console = RecordEncoder::new(EncoderConfig {
        format: OutputFormat::Console,
        ..Default::default()
    });
    group.bench_function("console", |b| {
        b.iter(|| black_box(console.encode(black_box(&entry))));
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = threshold_logger(LogLevel::Error);

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("Filtered message")));
    });

    group.bench_function("filtered_out_fmt", |b| {
        b.iter(|| logger.log_fmt(LogLevel::Debug, format_args!("value {}", black_box(7))));
    });

    group.finish();
}

// ============================================================================
// Sampling Benchmarks
// ============================================================================

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.throughput(Throughput::Elements(1));

    let sampled = Logger::builder()
        .destination(SeverityFilter::Threshold(LogLevel::Debug), NullSink)
        .stacktrace_level(None)
        .sampling(SamplingConfig::new(100, 100))
        .build();
    group.bench_function("sampled_logger_info", |b| {
        b.iter(|| sampled.info(black_box("Hot path message")));
    });

    let sampler = LogSampler::new(SamplingConfig::default());
    group.bench_function("sampler_decision", |b| {
        b.iter(|| black_box(sampler.should_sample(LogLevel::Info, black_box("Hot path message"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sync_logging,
    bench_fan_out,
    bench_concurrent_logging,
    bench_encoding,
    bench_level_filtering,
    bench_sampling,
);
criterion_main!(benches);
