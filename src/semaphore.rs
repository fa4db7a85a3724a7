//! Counting semaphore with a cooperative close signal.
//!
//! # Protocol
//!
//! A semaphore holds a non-negative permit count. `acquire` blocks while the
//! count is zero and decrements it on success; `release` increments it and
//! wakes one waiter. `close` marks the semaphore as shut down and wakes every
//! waiter: threads parked in `acquire` that will never see another permit
//! observe [`Disconnected`] instead of hanging forever.
//!
//! # Close semantics: drain, then fail
//!
//! Closing does not discard queued permits. An `acquire` racing with `close`
//! still wins any permit that was released before the close, so an item that
//! was legitimately produced cannot be lost. Only once the count is zero *and*
//! the semaphore is closed does `acquire` report [`Disconnected`].
//!
//! Closing is one-way; there is no reopen.
//!
//! # Threading
//!
//! All operations take `&self` and are safe to call from any thread. The
//! internal lock is held only for the permit bookkeeping, never across a
//! caller's critical section.

use std::sync::{Condvar, Mutex};

/// Returned by [`Semaphore::acquire`] once the semaphore is closed and no
/// permits remain.
///
/// This is a shutdown notification, not an error: a waiter that receives it
/// should treat the resource it was waiting for as permanently out of supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Disconnected;

#[derive(Debug)]
struct SemState {
    permits: usize,
    closed: bool,
}

/// Counting semaphore built on `Mutex` + `Condvar`.
///
/// # Invariants
///
/// - `permits` never underflows: `acquire` only decrements after observing a
///   positive count under the lock.
/// - Every `release` wakes at most one waiter; `close` wakes all of them.
#[derive(Debug)]
pub struct Semaphore {
    state: Mutex<SemState>,
    available: Condvar,
}

impl Semaphore {
    /// Create a semaphore holding `permits` initial permits.
    pub fn new(permits: usize) -> Self {
        Self {
            state: Mutex::new(SemState {
                permits,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    ///
    /// Returns `Err(Disconnected)` if the semaphore has been closed and the
    /// permit count is zero. Pending permits are drained before the closed
    /// state is reported.
    pub fn acquire(&self) -> Result<(), Disconnected> {
        let mut st = self.state.lock().expect("semaphore mutex poisoned");
        loop {
            if st.permits > 0 {
                st.permits -= 1;
                return Ok(());
            }
            if st.closed {
                return Err(Disconnected);
            }
            st = self
                .available
                .wait(st)
                .expect("semaphore mutex poisoned");
        }
    }

    /// Take a permit without blocking. Returns `false` when none is
    /// available (whether or not the semaphore is closed).
    pub fn try_acquire(&self) -> bool {
        let mut st = self.state.lock().expect("semaphore mutex poisoned");
        if st.permits > 0 {
            st.permits -= 1;
            true
        } else {
            false
        }
    }

    /// Return one permit and wake a single waiter.
    pub fn release(&self) {
        let mut st = self.state.lock().expect("semaphore mutex poisoned");
        st.permits += 1;
        drop(st);
        self.available.notify_one();
    }

    /// Shut the semaphore down and wake every parked waiter.
    ///
    /// Waiters drain any remaining permits first; after that, `acquire`
    /// returns [`Disconnected`]. Calling `close` twice is a no-op.
    pub fn close(&self) {
        let mut st = self.state.lock().expect("semaphore mutex poisoned");
        st.closed = true;
        drop(st);
        self.available.notify_all();
    }

    /// Current permit count. Snapshot only; stale by the time it returns.
    pub fn permits(&self) -> usize {
        self.state.lock().expect("semaphore mutex poisoned").permits
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().expect("semaphore mutex poisoned").closed
    }
}
