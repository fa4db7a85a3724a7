//! Conservation and termination over random valid configurations.
//!
//! Every configuration with at least one producer class and one consumer
//! must terminate with `total_consumed == items x (producers + faulty)`,
//! regardless of seed or how the scheduler interleaves the workers. Each
//! case spawns real threads, so the case count stays modest.

use proptest::prelude::*;

use prodcon_rs::{run, SimConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_valid_config_conserves_and_terminates(
        items in 1u64..=6,
        capacity in 1usize..=5,
        producers in 0usize..=2,
        faulty in 0usize..=2,
        consumers in 1usize..=3,
        seed in any::<u64>(),
    ) {
        prop_assume!(producers + faulty > 0);

        let config = SimConfig {
            items,
            capacity,
            producers,
            faulty,
            consumers,
            debug: false,
            seed,
        };
        let expected = config.total_expected();

        let report = run(config).unwrap();

        prop_assert_eq!(report.total_consumed, expected);
        prop_assert_eq!(report.total_produced(), expected);
        prop_assert_eq!(report.consumed_per_thread.iter().sum::<u64>(), expected);

        // Class purity, observed through the non-prime counter: faulty
        // values are never prime, functional values always are.
        prop_assert_eq!(report.nonprime_consumed, items * faulty as u64);

        // Full transitions require at least `capacity` inserts between
        // removes; they can never outnumber inserts. Same for empty.
        prop_assert!(report.buffer_full_events <= expected);
        prop_assert!(report.buffer_empty_events <= expected);
        if capacity as u64 > expected {
            prop_assert_eq!(report.buffer_full_events, 0);
        }
    }
}
