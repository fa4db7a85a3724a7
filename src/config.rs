//! Run configuration and pre-spawn validation.
//!
//! Every constraint here is checked before any thread exists. An invalid
//! configuration is a fatal startup error, never a runtime condition: a run
//! with consumers and nothing to produce (or the reverse) would simply park
//! forever, so it is rejected up front rather than timed out later.

use std::fmt;

use serde::Serialize;

/// Configuration surface consumed by the simulation core.
///
/// Assembled upstream (normally from the CLI) and validated once via
/// [`SimConfig::validate`] before workers spawn.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SimConfig {
    /// Items inserted per producer thread, functional or faulty.
    pub items: u64,
    /// Buffer capacity in slots.
    pub capacity: usize,
    /// Number of functional producer threads.
    pub producers: usize,
    /// Number of faulty producer threads.
    pub faulty: usize,
    /// Number of consumer threads.
    pub consumers: usize,
    /// Emit a trace line per insert/remove.
    pub debug: bool,
    /// Master RNG seed; per-worker generators are forked from it.
    pub seed: u64,
}

impl SimConfig {
    /// Total items a run inserts and therefore must consume:
    /// `items x (producers + faulty)`.
    pub fn total_expected(&self) -> u64 {
        self.items * (self.producers + self.faulty) as u64
    }

    /// Reject configurations that cannot make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items == 0 {
            return Err(ConfigError::ZeroItems);
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.producers + self.faulty == 0 {
            return Err(ConfigError::NoProducers);
        }
        if self.consumers == 0 {
            // total_expected > 0 at this point, so someone has to consume.
            return Err(ConfigError::NoConsumers);
        }
        Ok(())
    }
}

/// Why a configuration was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroItems,
    ZeroCapacity,
    NoProducers,
    NoConsumers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroItems => write!(f, "--items must be >= 1"),
            ConfigError::ZeroCapacity => write!(f, "--length must be >= 1"),
            ConfigError::NoProducers => {
                write!(f, "at least one producer class must be non-zero")
            }
            ConfigError::NoConsumers => {
                write!(f, "--consumers must be >= 1 when items will be produced")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
