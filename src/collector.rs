//! Instrumentation collector: per-action recording and run counters.
//!
//! The collector is a collaborator of the synchronization core, not part of
//! it. Workers report every successful insert/remove here while they hold
//! the pipeline mutex; nothing a worker reads back ever feeds a
//! synchronization decision.
//!
//! # Worker identity
//!
//! Each class (functional producers, faulty producers, consumers) gets a
//! registry that maps a `ThreadId` to a stable 1-based sequence index,
//! assigned on first observed action: the first functional producer seen is
//! `PRODUCER 1`, the second `PRODUCER 2`, and so on. Assignment is a hash
//! lookup under the collector lock; first seen gets the lowest index.
//!
//! # Event counters
//!
//! - buffer-full transitions: occupancy equals capacity right after an insert
//! - buffer-empty transitions: occupancy hits zero right after a remove
//! - non-prime consumptions: the removed value fails the primality test
//!
//! Occupancy is read while the pipeline mutex is still held, so the counts
//! are exact rather than a racy unlocked snapshot.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread::ThreadId;

use crate::buffer::BoundedBuffer;
use crate::generator::{is_prime, ProducerClass};

/// First-seen identity registry plus per-thread action tallies for one
/// worker class.
#[derive(Debug, Default)]
struct ClassRegistry {
    index_of: HashMap<ThreadId, usize>,
    actions: Vec<u64>,
}

impl ClassRegistry {
    /// Look up (or assign) the calling thread's index and count one action.
    /// Returns the 0-based index.
    fn record(&mut self, tid: ThreadId) -> usize {
        let next = self.index_of.len();
        let ix = *self.index_of.entry(tid).or_insert(next);
        if ix == self.actions.len() {
            self.actions.push(0);
        }
        self.actions[ix] += 1;
        ix
    }
}

#[derive(Debug, Default)]
struct CollectorState {
    functional: ClassRegistry,
    faulty: ClassRegistry,
    consumers: ClassRegistry,
    buffer_full_events: u64,
    buffer_empty_events: u64,
    nonprime_consumed: u64,
}

/// Final counter snapshot handed to reporting after all workers join.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// Items inserted per functional producer, by first-seen index.
    pub functional_produced: Vec<u64>,
    /// Items inserted per faulty producer, by first-seen index.
    pub faulty_produced: Vec<u64>,
    /// Items removed per consumer, by first-seen index.
    pub consumed_per_thread: Vec<u64>,
    pub buffer_full_events: u64,
    pub buffer_empty_events: u64,
    pub nonprime_consumed: u64,
}

/// Shared per-action event sink.
///
/// `record_insert` / `record_remove` must be called exactly once per
/// successful buffer operation, while the pipeline mutex is held. The
/// collector's own lock nests strictly inside the pipeline mutex, so the
/// lock order is the same on every path.
#[derive(Debug)]
pub struct Collector {
    debug: bool,
    items_per_producer: u64,
    state: Mutex<CollectorState>,
}

impl Collector {
    pub fn new(debug: bool, items_per_producer: u64) -> Self {
        Self {
            debug,
            items_per_producer,
            state: Mutex::new(CollectorState::default()),
        }
    }

    /// Record one successful insert. Returns the producer's 1-based index.
    pub fn record_insert(
        &self,
        class: ProducerClass,
        tid: ThreadId,
        value: u64,
        buffer: &BoundedBuffer,
    ) -> usize {
        let mut st = self.state.lock().expect("collector mutex poisoned");
        let reg = match class {
            ProducerClass::Functional => &mut st.functional,
            ProducerClass::Faulty => &mut st.faulty,
        };
        let ix = reg.record(tid);
        let count = reg.actions[ix];

        let became_full = buffer.is_full();
        if became_full {
            st.buffer_full_events += 1;
        }
        drop(st);

        if self.debug {
            let mut line = format!(
                "({} {:3} writes {:3}/{} {:6}): ",
                class.label(),
                ix + 1,
                count,
                self.items_per_producer,
                value
            );
            push_buffer_snapshot(&mut line, buffer);
            if became_full {
                line.push_str("*BUFFER NOW FULL* ");
            }
            println!("{line}");
        }

        ix + 1
    }

    /// Record one successful remove. Returns the consumer's 1-based index.
    pub fn record_remove(&self, tid: ThreadId, value: u64, buffer: &BoundedBuffer) -> usize {
        let mut st = self.state.lock().expect("collector mutex poisoned");
        let ix = st.consumers.record(tid);
        let count = st.consumers.actions[ix];

        let nonprime = !is_prime(value);
        if nonprime {
            st.nonprime_consumed += 1;
        }
        let became_empty = buffer.is_empty();
        if became_empty {
            st.buffer_empty_events += 1;
        }
        drop(st);

        if self.debug {
            let mut line = format!("(CONSUMER {:3} reads {:4} {:9}): ", ix + 1, count, value);
            push_buffer_snapshot(&mut line, buffer);
            if nonprime {
                line.push_str("*NOT PRIME* ");
            }
            if became_empty {
                line.push_str("*BUFFER NOW EMPTY* ");
            }
            println!("{line}");
        }

        ix + 1
    }

    /// Snapshot the accumulated counters. Called after all workers join, but
    /// safe (if momentarily stale) at any time.
    pub fn counters(&self) -> Counters {
        let st = self.state.lock().expect("collector mutex poisoned");
        Counters {
            functional_produced: st.functional.actions.clone(),
            faulty_produced: st.faulty.actions.clone(),
            consumed_per_thread: st.consumers.actions.clone(),
            buffer_full_events: st.buffer_full_events,
            buffer_empty_events: st.buffer_empty_events,
            nonprime_consumed: st.nonprime_consumed,
        }
    }
}

/// Append `(occupied): [ v1 v2 .. ]` to a trace line.
fn push_buffer_snapshot(line: &mut String, buffer: &BoundedBuffer) {
    use std::fmt::Write;
    let _ = write!(line, "({}): [ ", buffer.occupied());
    for v in buffer.iter_occupied() {
        let _ = write!(line, "{v:6}  ");
    }
    line.push_str("] ");
}
