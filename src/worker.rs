//! Producer and consumer loop bodies.
//!
//! Each worker is one OS thread running one of these loops over a shared
//! [`Pipeline`]. Producers insert a fixed number of items and exit
//! naturally; consumers loop until the pipeline reports that production has
//! ended and everything is consumed.

use crate::collector::Collector;
use crate::generator::{draw, next_prime, ProducerClass, XorShift64};
use crate::pipeline::{Consumed, Pipeline};

/// Insert exactly `items` values of the class's flavor.
///
/// Functional iterations rejection-sample until the draw is prime; faulty
/// iterations draw-and-double so the value is even. The loop ends early only
/// if the pipeline shuts down underneath it, which a valid run never does to
/// a producer.
pub fn run_producer(
    pipeline: &Pipeline,
    collector: &Collector,
    class: ProducerClass,
    items: u64,
    mut rng: XorShift64,
) {
    for _ in 0..items {
        let value = match class {
            ProducerClass::Functional => next_prime(&mut rng),
            ProducerClass::Faulty => draw(&mut rng, ProducerClass::Faulty),
        };
        if pipeline.produce(class, value, collector).is_err() {
            return;
        }
    }
}

/// Remove values until the run is complete.
///
/// Both exit conditions mean the same thing — all expected items were
/// consumed. `Drained` is the double-check inside the critical section
/// (woken with a permit but no corresponding item); `Disconnected` is the
/// closed `full` semaphore observed while parked.
pub fn run_consumer(pipeline: &Pipeline, collector: &Collector) {
    loop {
        match pipeline.consume(collector) {
            Ok(Consumed::Item(_)) => {}
            Ok(Consumed::Drained) | Err(_) => return,
        }
    }
}
