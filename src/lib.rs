//! Bounded-buffer producer/consumer simulation coordinated by counting
//! semaphores and a single mutex.
//!
//! ## Scope
//! This crate simulates a fixed-capacity circular buffer contended by
//! heterogeneous producers and multiple consumers, with deterministic
//! termination detection and coordinated shutdown of consumers blocked on
//! items that will never arrive.
//!
//! ## Key invariants
//! - Occupied-slot count always equals the `full` semaphore's value and
//!   stays within `[0, capacity]`; capacity is enforced by the semaphores,
//!   never by the cursors.
//! - Buffer mutations are serialized by one mutex: insertion order equals
//!   removal order (a single FIFO, no per-class ordering).
//! - Exactly `items x (producers + faulty)` values flow through a run, and
//!   the run ends with `total_consumed` equal to that product.
//! - Functional producers insert only primes; faulty producers insert only
//!   even numbers. Classification of consumed values is reporting only.
//!
//! ## Run flow
//! `SimConfig -> validate -> Pipeline + Collector -> spawn workers ->
//! join -> SimReport`
//!
//! ## Notable entry points
//! - [`runtime::run`]: one-call simulation driver.
//! - [`Pipeline`]: the synchronization triple, for driving produce/consume
//!   directly (the test harnesses do this).
//! - [`Collector`] / [`SimReport`]: instrumentation and final summary.
//!
//! ## Design trade-offs
//! All shared mutation funnels through a single mutex; the simulation is
//! about protocol correctness under contention, not throughput, so there is
//! deliberately no finer-grained locking and no lock-free path.

pub mod buffer;
pub mod collector;
pub mod config;
pub mod generator;
pub mod pipeline;
pub mod report;
pub mod runtime;
pub mod semaphore;
pub mod worker;

pub use buffer::{BoundedBuffer, EMPTY_SENTINEL};
pub use collector::{Collector, Counters};
pub use config::{ConfigError, SimConfig};
pub use generator::{
    draw, is_prime, next_prime, seed_from_clock, ProducerClass, XorShift64, FAULTY_MAX,
    FAULTY_MIN, FUNCTIONAL_MAX, FUNCTIONAL_MIN,
};
pub use pipeline::{Consumed, Pipeline};
pub use report::SimReport;
pub use runtime::run;
pub use semaphore::{Disconnected, Semaphore};
pub use worker::{run_consumer, run_producer};
