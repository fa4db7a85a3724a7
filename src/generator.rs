//! Value generation policy for the two producer classes.
//!
//! # Generator
//!
//! XorShift64 with Lemire bounded sampling: fast, deterministic, and
//! dependency-free. Each worker thread owns one generator, seeded once at
//! spawn from the run's master seed mixed with the worker ordinal. Nothing
//! is ever reseeded mid-run; seeding a shared generator from a coarse clock
//! on every call correlates draws across concurrent threads, so only the
//! range and parity/primality contracts below are promised, never specific
//! sequences.
//!
//! # Class policy
//!
//! - **Functional** producers draw uniformly from `[2, 999_999]` and
//!   rejection-sample until the draw is prime. Everything they insert is
//!   prime.
//! - **Faulty** producers draw uniformly from `[2, 499_999]` and double the
//!   result. Everything they insert is even (and >= 4, so never prime) by
//!   construction: a deliberate defect injector that exercises the
//!   consumers' non-prime detection path.

use std::time::{SystemTime, UNIX_EPOCH};

/// Inclusive draw range for functional producers.
pub const FUNCTIONAL_MIN: u64 = 2;
pub const FUNCTIONAL_MAX: u64 = 999_999;

/// Inclusive pre-doubling draw range for faulty producers.
pub const FAULTY_MIN: u64 = 2;
pub const FAULTY_MAX: u64 = 499_999;

/// Producer class tag. Decides the value policy, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProducerClass {
    /// Inserts only primes.
    Functional,
    /// Inserts only even numbers.
    Faulty,
}

impl ProducerClass {
    /// Label used in the per-action trace.
    pub fn label(self) -> &'static str {
        match self {
            ProducerClass::Functional => "PRODUCER",
            ProducerClass::Faulty => "FAULTY",
        }
    }
}

/// Deterministic XorShift64 generator.
///
/// Intentionally `Clone` but not `Copy`: copying an RNG duplicates the
/// stream. Use [`XorShift64::fork`] to derive independent per-worker
/// generators from a master seed.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator. Seed 0 is remapped to avoid the all-zero lockup
    /// state.
    #[inline]
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Next raw value. Shift constants (13, 7, 17) are Marsaglia's
    /// full-period triple.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform draw from the closed interval `[lo, hi]`.
    ///
    /// Uses Lemire's nearly-divisionless method for the bounded part.
    ///
    /// # Panics
    /// Panics in debug builds if `lo > hi`.
    #[inline]
    pub fn next_in(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo <= hi, "inverted range");
        lo + self.bounded(hi - lo + 1)
    }

    /// Lemire bounded sampling: maps a raw u64 uniformly onto `[0, upper)`
    /// with rare rejection to kill modulo bias.
    #[inline]
    fn bounded(&mut self, upper: u64) -> u64 {
        debug_assert!(upper > 0);
        let threshold = upper.wrapping_neg() % upper;
        loop {
            let x = self.next_u64();
            let m = (x as u128) * (upper as u128);
            if (m as u64) >= threshold {
                return (m >> 64) as u64;
            }
        }
    }

    /// Derive an independent generator, mixing through splitmix64 to
    /// decorrelate the child stream from the parent.
    pub fn fork(&mut self) -> Self {
        Self::new(splitmix64(self.next_u64()))
    }

    /// Current state, for reproducing a specific run.
    #[inline]
    pub fn state(&self) -> u64 {
        self.state
    }
}

/// SplitMix64 mixing step (Vigna). Each input bit flips roughly half the
/// output bits, which is what makes forked seeds safe.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Master seed for runs that did not pass `--seed`: wall-clock nanoseconds
/// mixed once at startup. This is the only place the clock feeds the RNG.
pub fn seed_from_clock() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9E3779B97F4A7C15);
    splitmix64(nanos)
}

/// One draw for the given class: functional range as-is, faulty range
/// doubled so the result is always even.
pub fn draw(rng: &mut XorShift64, class: ProducerClass) -> u64 {
    match class {
        ProducerClass::Functional => rng.next_in(FUNCTIONAL_MIN, FUNCTIONAL_MAX),
        ProducerClass::Faulty => rng.next_in(FAULTY_MIN, FAULTY_MAX) * 2,
    }
}

/// Rejection-sample functional draws until one is prime.
///
/// By the prime number theorem roughly one draw in `ln(10^6) ~ 14` lands on
/// a prime, so the expected iteration count is small and constant.
pub fn next_prime(rng: &mut XorShift64) -> u64 {
    loop {
        let candidate = draw(rng, ProducerClass::Functional);
        if is_prime(candidate) {
            return candidate;
        }
    }
}

/// Trial division up to the integer square root.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut i = 3u64;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_sequence() {
        let mut a = XorShift64::new(123);
        let mut b = XorShift64::new(123);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn zero_seed_does_not_lock_up() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn next_in_stays_inside_closed_interval() {
        let mut rng = XorShift64::new(42);
        for _ in 0..10_000 {
            let v = rng.next_in(5, 9);
            assert!((5..=9).contains(&v), "got {v}");
        }
        // Degenerate single-value interval.
        assert_eq!(rng.next_in(7, 7), 7);
    }

    #[test]
    fn functional_draws_in_range() {
        let mut rng = XorShift64::new(7);
        for _ in 0..10_000 {
            let v = draw(&mut rng, ProducerClass::Functional);
            assert!((FUNCTIONAL_MIN..=FUNCTIONAL_MAX).contains(&v));
        }
    }

    #[test]
    fn faulty_draws_are_even_and_in_range() {
        let mut rng = XorShift64::new(7);
        for _ in 0..10_000 {
            let v = draw(&mut rng, ProducerClass::Faulty);
            assert_eq!(v % 2, 0);
            assert!((FAULTY_MIN * 2..=FAULTY_MAX * 2).contains(&v));
        }
    }

    #[test]
    fn next_prime_returns_primes_in_functional_range() {
        let mut rng = XorShift64::new(99);
        for _ in 0..200 {
            let p = next_prime(&mut rng);
            assert!(is_prime(p), "{p} is not prime");
            assert!((FUNCTIONAL_MIN..=FUNCTIONAL_MAX).contains(&p));
        }
    }

    #[test]
    fn is_prime_small_cases() {
        let primes = [2u64, 3, 5, 7, 11, 13, 97, 7919, 999_983];
        let composites = [0u64, 1, 4, 6, 9, 15, 100, 999_999];
        for p in primes {
            assert!(is_prime(p), "{p}");
        }
        for c in composites {
            assert!(!is_prime(c), "{c}");
        }
    }

    #[test]
    fn fork_decorrelates_streams() {
        let mut master = XorShift64::new(42);
        let mut f1 = master.fork();
        let mut f2 = master.fork();
        let s1: Vec<u64> = (0..16).map(|_| f1.next_u64()).collect();
        let s2: Vec<u64> = (0..16).map(|_| f2.next_u64()).collect();
        assert_ne!(s1, s2);
    }

    #[test]
    fn bounded_is_roughly_uniform() {
        let mut rng = XorShift64::new(0xDEADBEEF);
        let mut counts = [0u32; 10];
        let trials = 100_000;
        for _ in 0..trials {
            counts[rng.next_in(0, 9) as usize] += 1;
        }
        let expected = trials as f64 / 10.0;
        for (i, &c) in counts.iter().enumerate() {
            let dev = ((c as f64) - expected).abs() / expected;
            assert!(dev < 0.1, "bucket {i} off by {:.1}%", dev * 100.0);
        }
    }
}
