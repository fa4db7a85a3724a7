//! Simulation driver: spawn every worker, wait, assemble the report.
//!
//! One OS thread per configured worker, spawned with `thread::Builder` and
//! a stable name (`producer-N`, `faulty-N`, `consumer-N`). Per-worker RNGs
//! are derived from the master seed mixed with a global worker ordinal, so
//! a seeded run draws reproducible value streams regardless of scheduling.
//!
//! Worker panics are collected at join time and re-thrown on the calling
//! thread after every other worker has been joined.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::collector::Collector;
use crate::config::{ConfigError, SimConfig};
use crate::generator::{ProducerClass, XorShift64};
use crate::pipeline::Pipeline;
use crate::report::SimReport;
use crate::worker::{run_consumer, run_producer};

/// Golden-ratio multiplier used to spread worker ordinals across seed space.
const SEED_MIX: u64 = 0x9E3779B97F4A7C15;

/// Run one complete simulation.
///
/// Validates the configuration, runs the full produce/consume protocol to
/// termination, and returns the counter snapshot plus elapsed time.
///
/// # Panics
///
/// Re-throws the first worker panic after all threads have been joined.
/// Workers only panic on broken synchronization invariants.
pub fn run(config: SimConfig) -> Result<SimReport, ConfigError> {
    config.validate()?;

    let total_expected = config.total_expected();
    let pipeline = Arc::new(Pipeline::new(config.capacity, total_expected));
    let collector = Arc::new(Collector::new(config.debug, config.items));

    let start = Instant::now();
    let mut handles: Vec<JoinHandle<()>> = Vec::new();
    let mut ordinal: u64 = 0;

    for (class, count, name) in [
        (ProducerClass::Functional, config.producers, "producer"),
        (ProducerClass::Faulty, config.faulty, "faulty"),
    ] {
        for i in 0..count {
            let pipeline = Arc::clone(&pipeline);
            let collector = Arc::clone(&collector);
            let items = config.items;
            let rng = XorShift64::new(config.seed ^ ordinal.wrapping_mul(SEED_MIX));
            ordinal += 1;

            let th = thread::Builder::new()
                .name(format!("{name}-{i}"))
                .spawn(move || run_producer(&pipeline, &collector, class, items, rng))
                .expect("failed to spawn producer thread");
            handles.push(th);
        }
    }

    for i in 0..config.consumers {
        let pipeline = Arc::clone(&pipeline);
        let collector = Arc::clone(&collector);

        let th = thread::Builder::new()
            .name(format!("consumer-{i}"))
            .spawn(move || run_consumer(&pipeline, &collector))
            .expect("failed to spawn consumer thread");
        handles.push(th);
    }

    // Join everything before re-throwing: a panicking worker poisons the
    // pipeline mutex, which unblocks the rest with their own panics.
    let mut first_panic = None;
    for th in handles {
        if let Err(p) = th.join() {
            first_panic.get_or_insert(p);
        }
    }
    if let Some(p) = first_panic {
        std::panic::resume_unwind(p);
    }

    let elapsed = start.elapsed();
    let total_consumed = pipeline.total_consumed();
    debug_assert_eq!(total_consumed, total_expected);

    Ok(SimReport::assemble(
        config,
        collector.counters(),
        total_consumed,
        elapsed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    fn config(items: u64, capacity: usize, p: usize, f: usize, c: usize) -> SimConfig {
        SimConfig {
            items,
            capacity,
            producers: p,
            faulty: f,
            consumers: c,
            debug: false,
            seed: 0xC0FFEE,
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let err = run(config(1, 1, 0, 0, 1)).unwrap_err();
        assert_eq!(err, ConfigError::NoProducers);
    }

    #[test]
    fn small_run_conserves_items() {
        let report = run(config(5, 3, 1, 1, 2)).unwrap();
        assert_eq!(report.total_consumed, 10);
        assert_eq!(report.total_produced(), 10);
        assert_eq!(report.consumed_per_thread.iter().sum::<u64>(), 10);
    }

    #[test]
    fn every_producer_inserts_its_quota() {
        let report = run(config(7, 2, 3, 2, 1)).unwrap();
        assert_eq!(report.functional_produced, vec![7, 7, 7]);
        assert_eq!(report.faulty_produced, vec![7, 7]);
    }
}
