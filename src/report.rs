//! Final run summary.
//!
//! Assembled after every worker has joined, from the collector's counters,
//! the pipeline's completion count, and the measured wall-clock duration.
//! Rendering is pure consumption of data the core produced; there is no
//! synchronization logic here.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::collector::Counters;
use crate::config::SimConfig;

/// Everything a finished run reports.
#[derive(Clone, Debug, Serialize)]
pub struct SimReport {
    /// The configuration the run executed.
    pub config: SimConfig,
    /// Items inserted per functional producer thread (1-based index order).
    pub functional_produced: Vec<u64>,
    /// Items inserted per faulty producer thread.
    pub faulty_produced: Vec<u64>,
    /// Items removed per consumer thread.
    pub consumed_per_thread: Vec<u64>,
    /// Times the buffer transitioned to completely full.
    pub buffer_full_events: u64,
    /// Times the buffer transitioned to completely empty.
    pub buffer_empty_events: u64,
    /// Removed values that failed the primality test.
    pub nonprime_consumed: u64,
    /// Total items removed; equals `config.total_expected()` for every
    /// valid run.
    pub total_consumed: u64,
    /// Wall-clock time from first spawn to last join.
    pub elapsed: Duration,
}

impl SimReport {
    /// Stitch counters, completion count and timing into a report.
    ///
    /// Per-thread vectors are padded out to the configured thread counts so
    /// a worker that never got scheduled for an action still shows up with
    /// a zero tally.
    pub fn assemble(
        config: SimConfig,
        mut counters: Counters,
        total_consumed: u64,
        elapsed: Duration,
    ) -> Self {
        counters.functional_produced.resize(config.producers, 0);
        counters.faulty_produced.resize(config.faulty, 0);
        counters.consumed_per_thread.resize(config.consumers, 0);

        Self {
            config,
            functional_produced: counters.functional_produced,
            faulty_produced: counters.faulty_produced,
            consumed_per_thread: counters.consumed_per_thread,
            buffer_full_events: counters.buffer_full_events,
            buffer_empty_events: counters.buffer_empty_events,
            nonprime_consumed: counters.nonprime_consumed,
            total_consumed,
            elapsed,
        }
    }

    /// Sum of all producer tallies, both classes.
    pub fn total_produced(&self) -> u64 {
        self.functional_produced.iter().sum::<u64>() + self.faulty_produced.iter().sum::<u64>()
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nPRODUCER / CONSUMER SIMULATION COMPLETE")?;
        writeln!(f, "=======================================")?;
        writeln!(
            f,
            "Number of Items Per Producer Thread: {}",
            self.config.items
        )?;
        writeln!(f, "Size of Buffer: {}", self.config.capacity)?;
        writeln!(f, "Number of Producer Threads: {}", self.config.producers)?;
        writeln!(
            f,
            "Number of Faulty Producer Threads: {}",
            self.config.faulty
        )?;
        writeln!(f, "Number of Consumer Threads: {}", self.config.consumers)?;
        writeln!(f)?;
        writeln!(
            f,
            "Number of Times Buffer Became Full: {}",
            self.buffer_full_events
        )?;
        writeln!(
            f,
            "Number of Times Buffer Became Empty: {}",
            self.buffer_empty_events
        )?;
        writeln!(f)?;
        writeln!(f, "Number of Non-primes Detected: {}", self.nonprime_consumed)?;
        writeln!(f, "Total Number of Items Consumed: {}", self.total_consumed)?;
        for (i, n) in self.consumed_per_thread.iter().enumerate() {
            writeln!(f, "  Thread {}: {}", i + 1, n)?;
        }
        writeln!(f)?;
        write!(
            f,
            "Total Simulation Time: {}.{:06} seconds",
            self.elapsed.as_secs(),
            self.elapsed.subsec_micros()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            items: 10,
            capacity: 5,
            producers: 2,
            faulty: 1,
            consumers: 2,
            debug: false,
            seed: 1,
        }
    }

    #[test]
    fn assemble_pads_vectors_to_configured_counts() {
        // One consumer did all the work; the other never acted.
        let counters = Counters {
            functional_produced: vec![10, 10],
            faulty_produced: vec![10],
            consumed_per_thread: vec![30],
            buffer_full_events: 2,
            buffer_empty_events: 1,
            nonprime_consumed: 10,
        };
        let report =
            SimReport::assemble(config(), counters, 30, Duration::from_millis(5));

        assert_eq!(report.consumed_per_thread, vec![30, 0]);
        assert_eq!(report.total_produced(), 30);
        assert_eq!(report.total_consumed, 30);
    }

    #[test]
    fn display_includes_the_headline_counters() {
        let report = SimReport::assemble(
            config(),
            Counters::default(),
            0,
            Duration::from_micros(1_500_042),
        );
        let text = report.to_string();
        assert!(text.contains("SIMULATION COMPLETE"));
        assert!(text.contains("Size of Buffer: 5"));
        assert!(text.contains("Total Simulation Time: 1.500042 seconds"));
    }

    #[test]
    fn serializes_to_json() {
        let report = SimReport::assemble(
            config(),
            Counters::default(),
            0,
            Duration::from_millis(1),
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"total_consumed\":0"));
        assert!(json.contains("\"buffer_full_events\":0"));
    }
}
