//! Value-policy contracts over arbitrary seeds.
//!
//! The generator promises ranges, parity, and primality, never specific
//! sequences. These contracts hold for every seed, not just the ones the
//! unit tests happen to pick.

use proptest::prelude::*;

use prodcon_rs::{
    draw, is_prime, next_prime, ProducerClass, XorShift64, FAULTY_MAX, FAULTY_MIN,
    FUNCTIONAL_MAX, FUNCTIONAL_MIN,
};

proptest! {
    #[test]
    fn functional_draws_stay_in_range(seed in any::<u64>()) {
        let mut rng = XorShift64::new(seed);
        for _ in 0..100 {
            let v = draw(&mut rng, ProducerClass::Functional);
            prop_assert!((FUNCTIONAL_MIN..=FUNCTIONAL_MAX).contains(&v));
        }
    }

    #[test]
    fn faulty_draws_are_even_and_in_range(seed in any::<u64>()) {
        let mut rng = XorShift64::new(seed);
        for _ in 0..100 {
            let v = draw(&mut rng, ProducerClass::Faulty);
            prop_assert_eq!(v % 2, 0);
            prop_assert!((FAULTY_MIN * 2..=FAULTY_MAX * 2).contains(&v));
        }
    }

    #[test]
    fn next_prime_always_returns_a_prime(seed in any::<u64>()) {
        let mut rng = XorShift64::new(seed);
        for _ in 0..20 {
            let p = next_prime(&mut rng);
            prop_assert!(is_prime(p));
            prop_assert!((FUNCTIONAL_MIN..=FUNCTIONAL_MAX).contains(&p));
        }
    }

    #[test]
    fn primes_above_two_have_no_small_factor(n in 3u64..1_000_000) {
        if is_prime(n) {
            prop_assert_eq!(n % 2, 1);
            for d in [3u64, 5, 7, 11, 13] {
                if d < n {
                    prop_assert_ne!(n % d, 0);
                }
            }
        }
    }
}
