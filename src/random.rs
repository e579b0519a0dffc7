use rand::Rng;

const MULTIPLIER_A: i64 = 1103515245;
const INCREMENT_C: i64 = 12345;
const DEFAULT_SEED: i64 = 3819201;

/// Source of randomness for playouts.
pub trait RandomGenerator: Default {
    /// Returns a number in `from..to`, or `from` when the range is empty.
    fn next_range(&mut self, from: i32, to: i32) -> i32;

    /// Picks a random element of a non-empty slice. Returns `None` for an empty slice.
    fn get_random_from_slice<'a, K>(&mut self, slice: &'a [K]) -> Option<&'a K> {
        if slice.is_empty() {
            return None;
        }
        slice.get(self.next_range(0, slice.len() as i32) as usize)
    }
}

/// Generator backed by the thread-local rng of the `rand` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRandomGenerator;

impl RandomGenerator for StandardRandomGenerator {
    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        if to <= from {
            return from;
        }
        rand::rng().random_range(from..to)
    }
}

/// Seeded linear congruential generator. Two generators with the same seed produce the same
/// sequence, which makes searches reproducible.
#[derive(Debug, Clone)]
pub struct CustomNumberGenerator {
    seed: i64,
}

impl Default for CustomNumberGenerator {
    fn default() -> Self {
        CustomNumberGenerator::new(DEFAULT_SEED)
    }
}

impl RandomGenerator for CustomNumberGenerator {
    fn next_range(&mut self, from: i32, to: i32) -> i32 {
        if to <= from {
            return from;
        }
        (self.next() % (to - from)).abs() + from
    }
}

impl CustomNumberGenerator {
    /// Any seed is accepted; it is reduced modulo `i32::MAX` so the state never overflows.
    pub const fn new(seed: i64) -> Self {
        Self {
            seed: seed.rem_euclid(i32::MAX as i64),
        }
    }

    pub fn next(&mut self) -> i32 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % (i32::MAX as i64);
        self.seed as i32
    }
}

#[cfg(test)]
mod tests {
    use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};

    #[test]
    fn outputs_same_numbers() {
        let mut crg = CustomNumberGenerator::new(42);
        assert_eq!(crg.next_range(0, 10), 8);
        assert_eq!(crg.next_range(0, 10), 4);
        assert_eq!(crg.next_range(0, 10), 1);
        assert_eq!(crg.next_range(0, 10), 2);
        assert_eq!(crg.next_range(0, 10), 4);
    }

    #[test]
    fn random_from_slice_should_be_same() {
        let vec = vec![432, 6542, 534, 6, 13, 645, 88, 2352, 345, 2667, 8287];
        let mut crg = CustomNumberGenerator::default();
        assert_eq!(crg.get_random_from_slice(&vec), Some(&6));
        assert_eq!(crg.get_random_from_slice(&vec), Some(&2667));
        assert_eq!(crg.get_random_from_slice(&vec), Some(&534));
        assert_eq!(crg.get_random_from_slice(&vec), Some(&8287));
        assert_eq!(crg.get_random_from_slice(&vec), Some(&6));
    }

    #[test]
    fn random_from_empty_slice_is_none() {
        let empty: [u8; 0] = [];
        assert_eq!(CustomNumberGenerator::default().get_random_from_slice(&empty), None);
        assert_eq!(StandardRandomGenerator.get_random_from_slice(&empty), None);
    }

    #[test]
    fn extreme_seeds_do_not_overflow() {
        for seed in [i64::MAX, i64::MAX / 2, i64::MIN, -1] {
            let mut crg = CustomNumberGenerator::new(seed);
            for _ in 0..10 {
                let n = crg.next();
                assert!(n >= 0);
                assert!((0..10).contains(&crg.next_range(0, 10)));
            }
        }
    }

    #[test]
    fn seeds_equal_modulo_i32_max_give_same_sequence() {
        let mut small = CustomNumberGenerator::new(42);
        let mut large = CustomNumberGenerator::new(42 + i32::MAX as i64);
        for _ in 0..5 {
            assert_eq!(small.next(), large.next());
        }
    }

    #[test]
    fn empty_range_returns_lower_bound() {
        assert_eq!(CustomNumberGenerator::default().next_range(5, 5), 5);
        assert_eq!(CustomNumberGenerator::default().next_range(7, 3), 7);
        assert_eq!(StandardRandomGenerator.next_range(5, 5), 5);
    }

    #[test]
    fn standard_generator_stays_in_range() {
        let mut rg = StandardRandomGenerator;
        for _ in 0..100 {
            let n = rg.next_range(3, 7);
            assert!((3..7).contains(&n));
        }
    }
}
