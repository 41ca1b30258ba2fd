//! Log core composition
//!
//! Binds a shared encoder and the logger-level options from [`Config`] to a
//! set of destinations, producing one [`Logger`].

use crate::config::Config;
use crate::core::{Destination, FanOutCore, LogSampler, Logger, RecordEncoder, Result};

/// Compose `destinations` into a logger configured by `config`
///
/// Every destination becomes one log core. Caller and stack trace capture
/// apply to all cores alike. When sampling is configured the decision is
/// made once per record, before the record is offered to any core. The
/// level string is not consulted here; the destinations already carry their
/// filters.
///
/// # Example
///
/// ```
/// use level_split_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let config = Config::new().with_level("warn");
/// let destinations = build_destinations_with_sinks(&config, vec![Box::new(sink.clone())]).unwrap();
/// let logger = compose_logger(&config, destinations).unwrap();
///
/// logger.info("dropped");
/// logger.warn("kept");
/// assert_eq!(sink.lines().len(), 1);
/// ```
pub fn compose_logger(config: &Config, destinations: Vec<Destination>) -> Result<Logger> {
    if let Some(ref sampling) = config.sampling {
        sampling.validate()?;
    }

    let encoder = RecordEncoder::new(config.encoder_config()?);
    let logger = Logger::new(FanOutCore::new(encoder, destinations), config.logger_options());

    Ok(match config.sampling {
        Some(ref sampling) => logger.with_sampler(LogSampler::new(sampling.clone())),
        None => logger,
    })
}
