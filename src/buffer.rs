//! Fixed-capacity circular buffer shared by every worker thread.
//!
//! # Invariants
//!
//! - `head` is the next write position, `tail` the next read position; both
//!   stay in `[0, capacity)`.
//! - `occupied` equals the number of non-sentinel slots, and always matches
//!   the value of the `full` counting semaphore at the instant the pipeline
//!   mutex is released.
//! - Slots hold [`EMPTY_SENTINEL`] exactly when logically empty. Generated
//!   values are always >= 2, so the sentinel can never be confused with data.
//!
//! # Threading
//!
//! This type is not synchronized. Capacity is enforced by the empty/full
//! semaphores, not by the cursors: `push` on a full buffer or `pop` on an
//! empty one means the semaphore protocol was broken, and both panic rather
//! than continue.

/// Slot value meaning "empty". No produced value can collide with it.
pub const EMPTY_SENTINEL: u64 = 0;

/// Bounded circular queue with head/tail cursors and sentinel-marked slots.
#[derive(Debug)]
pub struct BoundedBuffer {
    slots: Vec<u64>,
    head: usize,
    tail: usize,
    occupied: usize,
}

impl BoundedBuffer {
    /// Allocate a buffer of `capacity` empty slots.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be > 0");
        Self {
            slots: vec![EMPTY_SENTINEL; capacity],
            head: 0,
            tail: 0,
            occupied: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding a value.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupied == self.slots.len()
    }

    /// Write `value` at the head cursor and advance it.
    ///
    /// # Panics
    /// Panics if the buffer is full (semaphore invariant broken) or if
    /// `value` is the empty sentinel.
    pub fn push(&mut self, value: u64) {
        assert!(
            !self.is_full(),
            "push into full buffer: empty-semaphore invariant broken"
        );
        assert!(value != EMPTY_SENTINEL, "sentinel value cannot be inserted");
        debug_assert_eq!(self.slots[self.head], EMPTY_SENTINEL);

        self.slots[self.head] = value;
        self.head = (self.head + 1) % self.slots.len();
        self.occupied += 1;
    }

    /// Read the value at the tail cursor, reset the slot to the sentinel,
    /// and advance the cursor.
    ///
    /// # Panics
    /// Panics if the buffer is empty (semaphore invariant broken).
    pub fn pop(&mut self) -> u64 {
        assert!(
            !self.is_empty(),
            "pop from empty buffer: full-semaphore invariant broken"
        );

        let value = self.slots[self.tail];
        debug_assert_ne!(value, EMPTY_SENTINEL);

        self.slots[self.tail] = EMPTY_SENTINEL;
        self.tail = (self.tail + 1) % self.slots.len();
        self.occupied -= 1;
        value
    }

    /// Iterate the live values in FIFO order (oldest first).
    ///
    /// Used by the instrumentation trace to render buffer contents; callers
    /// hold the pipeline mutex, so the snapshot is exact.
    pub fn iter_occupied(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.occupied).map(move |i| self.slots[(self.tail + i) % self.slots.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mut buf = BoundedBuffer::new(3);
        buf.push(10);
        buf.push(20);
        buf.push(30);
        assert_eq!(buf.pop(), 10);
        assert_eq!(buf.pop(), 20);
        assert_eq!(buf.pop(), 30);
        assert!(buf.is_empty());
    }

    #[test]
    fn cursors_wrap_around() {
        let mut buf = BoundedBuffer::new(2);
        for round in 1..=10u64 {
            buf.push(round);
            buf.push(round + 100);
            assert!(buf.is_full());
            assert_eq!(buf.pop(), round);
            assert_eq!(buf.pop(), round + 100);
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn pop_resets_slot_to_sentinel() {
        let mut buf = BoundedBuffer::new(2);
        buf.push(7);
        buf.pop();
        // All slots are sentinel again, so nothing is iterated.
        assert_eq!(buf.iter_occupied().count(), 0);
        assert_eq!(buf.occupied(), 0);
    }

    #[test]
    fn occupied_tracks_within_capacity() {
        let mut buf = BoundedBuffer::new(4);
        for v in [2u64, 3, 5] {
            buf.push(v);
        }
        assert_eq!(buf.occupied(), 3);
        assert!(buf.occupied() <= buf.capacity());
        buf.pop();
        assert_eq!(buf.occupied(), 2);
    }

    #[test]
    fn iter_occupied_is_oldest_first_across_wrap() {
        let mut buf = BoundedBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        buf.pop();
        buf.push(4); // wraps to slot 0
        let live: Vec<u64> = buf.iter_occupied().collect();
        assert_eq!(live, vec![2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "push into full buffer")]
    fn push_into_full_buffer_panics() {
        let mut buf = BoundedBuffer::new(1);
        buf.push(2);
        buf.push(3);
    }

    #[test]
    #[should_panic(expected = "pop from empty buffer")]
    fn pop_from_empty_buffer_panics() {
        let mut buf = BoundedBuffer::new(1);
        buf.pop();
    }

    #[test]
    #[should_panic(expected = "sentinel value")]
    fn sentinel_cannot_be_inserted() {
        let mut buf = BoundedBuffer::new(1);
        buf.push(EMPTY_SENTINEL);
    }
}
