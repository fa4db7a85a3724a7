//! Synchronization core: one mutex, two counting semaphores, one buffer.
//!
//! # Protocol
//!
//! - `empty` starts at `capacity` and counts free slots; a producer takes
//!   one permit before inserting.
//! - `full` starts at 0 and counts occupied slots; a consumer takes one
//!   permit before removing.
//! - The mutex serializes every mutation of the buffer cursors, the slot
//!   contents, and `total_consumed`. There is exactly one critical section
//!   per insert and one per remove.
//!
//! Acquire order is always (count semaphore, then mutex); release order is
//! (mutex, then the *other* count semaphore). A thread never holds the
//! mutex while blocked on a count semaphore, which is what rules out
//! deadlock between the three primitives.
//!
//! # Termination
//!
//! Exactly `total_expected` items are ever inserted, so the remove that
//! brings `total_consumed` up to `total_expected` is the unique last one.
//! The consumer that performs it closes the `full` semaphore, waking every
//! sibling parked there; they observe the close as "no more work" and exit.
//! Any consumer that wakes holding a `full` permit but finds the target
//! count already reached exits without touching the buffer — that
//! double-check lives inside the critical section because the race between
//! the last remove and the count read must be serialized by the same mutex
//! that guards the buffer.

use std::sync::Mutex;
use std::thread;

use crate::buffer::BoundedBuffer;
use crate::collector::Collector;
use crate::generator::ProducerClass;
use crate::semaphore::{Disconnected, Semaphore};

/// Outcome of one [`Pipeline::consume`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consumed {
    /// One item was removed from the buffer.
    Item(u64),
    /// The expected total was already consumed; nothing was removed and the
    /// caller should exit.
    Drained,
}

/// State guarded by the pipeline mutex.
#[derive(Debug)]
struct PipelineState {
    buffer: BoundedBuffer,
    total_consumed: u64,
}

/// Shared synchronization triple plus the completion counter.
///
/// One `Pipeline` is shared (via `Arc`) by every worker for the run's
/// duration; no thread owns it exclusively.
#[derive(Debug)]
pub struct Pipeline {
    state: Mutex<PipelineState>,
    empty: Semaphore,
    full: Semaphore,
    total_expected: u64,
}

impl Pipeline {
    /// Build a pipeline around a buffer of `capacity` slots, expecting
    /// exactly `total_expected` items to flow through.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, total_expected: u64) -> Self {
        Self {
            state: Mutex::new(PipelineState {
                buffer: BoundedBuffer::new(capacity),
                total_consumed: 0,
            }),
            empty: Semaphore::new(capacity),
            full: Semaphore::new(0),
            total_expected,
        }
    }

    pub fn total_expected(&self) -> u64 {
        self.total_expected
    }

    /// Items consumed so far. Exact once all workers have joined.
    pub fn total_consumed(&self) -> u64 {
        self.state
            .lock()
            .expect("pipeline mutex poisoned")
            .total_consumed
    }

    /// Insert one value: `empty.acquire -> lock -> push+record -> unlock ->
    /// full.release`.
    ///
    /// `Err(Disconnected)` means the pipeline was shut down while the caller
    /// was blocked on a free slot; in a valid run producers finish their
    /// fixed iteration count before that can happen.
    pub fn produce(
        &self,
        class: ProducerClass,
        value: u64,
        collector: &Collector,
    ) -> Result<(), Disconnected> {
        self.empty.acquire()?;
        {
            let mut st = self.state.lock().expect("pipeline mutex poisoned");
            st.buffer.push(value);
            collector.record_insert(class, thread::current().id(), value, &st.buffer);
        }
        self.full.release();
        Ok(())
    }

    /// Remove one value: `full.acquire -> lock -> double-check -> pop+count+
    /// record -> unlock -> empty.release`, closing `full` after the last
    /// remove.
    ///
    /// `Err(Disconnected)` means production has fully ended and all items
    /// are consumed; treat it exactly like [`Consumed::Drained`].
    pub fn consume(&self, collector: &Collector) -> Result<Consumed, Disconnected> {
        self.full.acquire()?;

        let (value, last) = {
            let mut st = self.state.lock().expect("pipeline mutex poisoned");
            if st.total_consumed == self.total_expected {
                // Woken with a permit after the run completed; no item
                // corresponds to it, so removing would read past the end of
                // production.
                return Ok(Consumed::Drained);
            }
            let value = st.buffer.pop();
            st.total_consumed += 1;
            collector.record_remove(thread::current().id(), value, &st.buffer);
            (value, st.total_consumed == self.total_expected)
        };

        self.empty.release();

        if last {
            // Production has ended and every item is consumed: siblings
            // parked on `full` will never see another permit. Wake them all.
            self.full.close();
        }

        Ok(Consumed::Item(value))
    }

    /// Shut the pipeline down, waking any consumer parked on `full` and any
    /// producer parked on `empty`.
    ///
    /// The normal termination path closes `full` from the last remove; this
    /// is for driving a `Pipeline` directly when no items (or fewer than
    /// planned) will be produced.
    pub fn shutdown(&self) {
        self.full.close();
        self.empty.close();
    }
}
