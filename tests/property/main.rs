//! Property-based soundness tests.
//!
//! Run with: `cargo test --test property`

mod generator_contracts;
mod sim_conservation;
